//! Priority target tracking and lock-on.
//!
//! The tracker picks the best visible target each tick and manages a
//! lock with hysteresis. A held lock is never re-arbitrated: once
//! locked, the robot pursues that target until capture, manual
//! takeover, or the target disappearing. Acquisition compares the
//! candidate against the remembered target by category priority first
//! and by distance improvement second.

use crate::config::TrackerConfig;
use crate::core::{angle_within, Point2};
use crate::sensor::Snapshot;
use crate::target::{TargetField, TargetId};

/// Current lock bookkeeping.
///
/// `target` is remembered across unlock so acquisition can apply the
/// distance-improvement margin against it; `locked` says whether the
/// supervisor should pursue.
#[derive(Clone, Copy, Debug, Default)]
pub struct LockState {
    pub target: Option<TargetId>,
    pub locked: bool,
}

/// Outcome of one tracker update, for status reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockEvent {
    /// A new lock was acquired this tick.
    Acquired(TargetId),
    /// The locked target no longer resolves; lock dropped.
    Lost,
    None,
}

pub struct TargetTracker {
    config: TrackerConfig,
    state: LockState,
}

impl TargetTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            state: LockState::default(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    /// Id of the pursued target, if a lock is held.
    pub fn locked_target(&self) -> Option<TargetId> {
        if self.state.locked {
            self.state.target
        } else {
            None
        }
    }

    /// Drop the lock and forget the remembered target. Called on
    /// capture, on manual takeover, and on pattern reset.
    pub fn clear(&mut self) {
        self.state = LockState::default();
    }

    /// Evaluate visibility and lock state for this tick.
    ///
    /// `allow_lock` is false under manual control: the lock is cleared
    /// and no acquisition happens.
    pub fn update(
        &mut self,
        targets: &TargetField,
        snapshot: &Snapshot,
        position: Point2,
        allow_lock: bool,
    ) -> LockEvent {
        if !allow_lock {
            self.clear();
            return LockEvent::None;
        }

        // A held lock is only revalidated, never re-arbitrated.
        if self.state.locked {
            match self.state.target {
                Some(id) if targets.contains(id) => return LockEvent::None,
                _ => {
                    log::debug!("locked target vanished, dropping lock");
                    self.clear();
                    return LockEvent::Lost;
                }
            }
        }

        let candidate = match self.best_candidate(targets, snapshot, position) {
            Some(c) => c,
            None => return LockEvent::None,
        };

        let acquire = match self.state.target.and_then(|id| targets.get(id)) {
            None => true,
            Some(remembered) => {
                let remembered_dist = position.distance(remembered.position);
                candidate.1.kind.outranks(remembered.kind)
                    || (candidate.1.kind == remembered.kind
                        && remembered_dist - candidate.0 > self.config.lock_distance_margin)
            }
        };

        if acquire {
            let id = candidate.1.id;
            log::info!(
                "lock acquired: {} at {:.1}m",
                candidate.1.kind.label(),
                candidate.0
            );
            self.state = LockState {
                target: Some(id),
                locked: true,
            };
            LockEvent::Acquired(id)
        } else {
            LockEvent::None
        }
    }

    /// Top-priority visible target; ties broken by nearer distance.
    fn best_candidate<'a>(
        &self,
        targets: &'a TargetField,
        snapshot: &Snapshot,
        position: Point2,
    ) -> Option<(f32, &'a crate::target::Target)> {
        let mut best: Option<(f32, &crate::target::Target)> = None;
        for target in targets.iter() {
            let dist = position.distance(target.position);
            if dist > self.config.detection_range {
                continue;
            }
            if !self.is_visible(snapshot, position, target.position, dist) {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_dist, best_target)) => {
                    target.kind.outranks(best_target.kind)
                        || (target.kind == best_target.kind && dist < best_dist)
                }
            };
            if better {
                best = Some((dist, target));
            }
        }
        best
    }

    /// Within the always-detect radius, or a heat-bearing ray points
    /// close enough at the target.
    fn is_visible(
        &self,
        snapshot: &Snapshot,
        position: Point2,
        target_pos: Point2,
        dist: f32,
    ) -> bool {
        if dist < self.config.always_detect_radius {
            return true;
        }
        let bearing = position.angle_to(target_pos);
        snapshot
            .heat
            .iter()
            .any(|r| angle_within(r.angle, bearing, self.config.bearing_tolerance))
    }
}
