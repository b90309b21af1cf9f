//! # Anvesha-Nav: Search-and-Rescue Navigation Engine
//!
//! A per-tick navigation decision engine for a ground robot sweeping a
//! walled arena for prioritized heat signatures. The engine is headless
//! and deterministic: it consumes the arena geometry and target set,
//! runs one decision cycle per `tick()`, and emits a commanded pose
//! plus a human-readable mission status.
//!
//! ## Pipeline
//!
//! Each tick runs, in order:
//!
//! 1. **Sensor scan** ([`sensor`]): a fan of range-limited rays builds a
//!    fresh perception snapshot (clear / blocked / heat-bearing rays).
//! 2. **Target tracking** ([`tracker`]): priority arbitration with
//!    hysteresis decides whether to lock onto a detected signature.
//! 3. **Behavior dispatch** ([`supervisor`]): manual drive, locked
//!    pursuit, in-place rotation scan, or the active coverage pattern
//!    ([`patterns`]: grid sweep, spiral, perimeter sweep, random
//!    patrol).
//! 4. **Motion smoothing** ([`motion`]): the actual pose is
//!    exponentially blended toward the commanded pose, with stuck
//!    detection feeding an emergency-exit preference.
//!
//! ## Quick start
//!
//! ```rust
//! use anvesha_nav::{Simulation, SimConfig};
//!
//! let mut sim = Simulation::new(SimConfig::default());
//! for _ in 0..100 {
//!     let report = sim.tick();
//!     println!("{} ({:.1}, {:.1})", report.status, report.position.x, report.position.y);
//! }
//! ```
//!
//! All mutable state lives inside one [`Simulation`] context owned by
//! the caller; there is no global state and no internal threading.

pub mod arena;
pub mod clock;
pub mod config;
pub mod core;
pub mod error;
pub mod motion;
pub mod patterns;
pub mod sensor;
pub mod simulation;
pub mod status;
pub mod supervisor;
pub mod target;
pub mod tracker;

pub use arena::{Arena, Obstacle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SimConfig;
pub use core::Point2;
pub use error::{NavError, Result};
pub use motion::MotionController;
pub use patterns::{MissionState, Pattern};
pub use sensor::{RayClass, RayRecord, Scanner, Snapshot};
pub use simulation::{Mode, RobotState, Simulation, TickReport};
pub use status::MissionStatus;
pub use supervisor::{ManualInput, NavSupervisor};
pub use target::{Target, TargetField, TargetId, TargetKind};
pub use tracker::{LockState, TargetTracker};
