//! Ray-fan sensor scanner producing the per-tick perception snapshot.
//!
//! The scanner casts a fixed field-of-view fan of rays centered on the
//! robot heading, marching each ray in fixed steps until it terminates
//! at a wall (or an obstacle when see-through is off). Every ray yields
//! one record; the records are bucketed into derived views (clear,
//! blocked, heat-bearing, best-quality, emergency-exit) that are
//! recomputed from scratch on every scan and never carried across
//! ticks.

use crate::arena::Arena;
use crate::config::SensorConfig;
use crate::core::Point2;
use crate::target::{TargetField, TargetId, TargetKind};

/// Terminal classification of a single ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayClass {
    Clear,
    Wall,
    Obstacle,
}

/// One ray of the perception snapshot.
#[derive(Clone, Copy, Debug)]
pub struct RayRecord {
    /// Absolute bearing of the ray (radians, CCW from +X).
    pub angle: f32,
    /// Distance to the last sampled point before termination.
    pub distance: f32,
    /// Longest unobstructed sub-distance along the ray.
    pub clear_distance: f32,
    /// Path quality: `clear_distance / max_range`, in [0, 1].
    pub quality: f32,
    pub class: RayClass,
    /// A heat signature lay within the detection radius of some sample.
    pub has_heat: bool,
    /// The detected signature was a human survivor.
    pub has_human: bool,
    /// Last target detected along the ray, if any.
    pub target: Option<TargetId>,
}

/// Perception snapshot for one scan.
///
/// Bucket ordering: `clear` and `best_paths` descend by quality;
/// `heat` and `human` descend by ray distance, farthest detection
/// first. Pursuit and `best_direction` rely on this ordering.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub rays: Vec<RayRecord>,
    pub clear: Vec<RayRecord>,
    pub blocked: Vec<RayRecord>,
    pub heat: Vec<RayRecord>,
    pub human: Vec<RayRecord>,
    pub best_paths: Vec<RayRecord>,
    pub emergency_exits: Vec<RayRecord>,
    /// Any heat signature detected this scan (rays or close range).
    pub heat_detected: bool,
    /// Deduplicated categories seen this scan.
    pub detected_kinds: Vec<TargetKind>,
}

impl Snapshot {
    pub fn clear_count(&self) -> usize {
        self.clear.len()
    }

    /// Best clear ray whose bearing lies within `tolerance` of `bearing`.
    pub fn clear_ray_toward(&self, bearing: f32, tolerance: f32) -> Option<&RayRecord> {
        self.clear
            .iter()
            .find(|r| crate::core::angle_within(r.angle, bearing, tolerance))
    }

    fn sort_buckets(&mut self) {
        let by_quality_desc = |a: &RayRecord, b: &RayRecord| {
            b.quality
                .partial_cmp(&a.quality)
                .unwrap_or(std::cmp::Ordering::Equal)
        };
        let by_distance_desc = |a: &RayRecord, b: &RayRecord| {
            b.distance
                .partial_cmp(&a.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        };
        self.clear.sort_by(by_quality_desc);
        self.best_paths.sort_by(by_quality_desc);
        self.heat.sort_by(by_distance_desc);
        self.human.sort_by(by_distance_desc);
    }
}

/// The ray-fan scanner.
///
/// Holds the latest snapshot and a wall-clock rate gate: a call within
/// `min_scan_interval_ms` of the previous scan is skipped entirely and
/// returns the previous heat-detected flag, bounding scan frequency
/// independent of tick rate.
pub struct Scanner {
    config: SensorConfig,
    snapshot: Snapshot,
    last_scan_ms: Option<u64>,
}

impl Scanner {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            snapshot: Snapshot::default(),
            last_scan_ms: None,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SensorConfig {
        &mut self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Drop the rate gate so the next call scans unconditionally.
    pub fn reset_gate(&mut self) {
        self.last_scan_ms = None;
    }

    /// Run one scan; returns the heat-detected flag.
    pub fn scan(
        &mut self,
        arena: &Arena,
        targets: &TargetField,
        position: Point2,
        heading: f32,
        now_ms: u64,
    ) -> bool {
        if let Some(last) = self.last_scan_ms {
            if now_ms.saturating_sub(last) < self.config.min_scan_interval_ms {
                return self.snapshot.heat_detected;
            }
        }
        self.last_scan_ms = Some(now_ms);

        let cfg = &self.config;
        let mut snapshot = Snapshot::default();
        snapshot.rays.reserve(cfg.num_rays);

        for i in 0..cfg.num_rays {
            let fraction = if cfg.num_rays > 1 {
                i as f32 / (cfg.num_rays - 1) as f32
            } else {
                0.5
            };
            let angle = heading - cfg.fov / 2.0 + fraction * cfg.fov;
            let record = march_ray(arena, targets, cfg, position, angle);

            match record.class {
                RayClass::Clear => {
                    snapshot.clear.push(record);
                    if record.clear_distance > cfg.max_range * cfg.best_path_quality {
                        snapshot.best_paths.push(record);
                    }
                    if record.clear_distance > cfg.max_range * cfg.emergency_quality {
                        snapshot.emergency_exits.push(record);
                    }
                }
                RayClass::Wall | RayClass::Obstacle => snapshot.blocked.push(record),
            }

            if record.has_heat {
                snapshot.heat_detected = true;
                snapshot.heat.push(record);
                if let Some(id) = record.target {
                    if let Some(target) = targets.get(id) {
                        if !snapshot.detected_kinds.contains(&target.kind) {
                            snapshot.detected_kinds.push(target.kind);
                        }
                    }
                }
            }
            if record.has_human {
                snapshot.human.push(record);
            }

            snapshot.rays.push(record);
        }

        // Close-range signatures register regardless of ray coverage.
        for target in targets.iter() {
            if position.distance(target.position) < cfg.near_detect_radius {
                snapshot.heat_detected = true;
                if !snapshot.detected_kinds.contains(&target.kind) {
                    snapshot.detected_kinds.push(target.kind);
                }
            }
        }

        snapshot.sort_buckets();

        log::debug!(
            "scan: {} clear / {} blocked / {} heat rays, heat_detected={}",
            snapshot.clear.len(),
            snapshot.blocked.len(),
            snapshot.heat.len(),
            snapshot.heat_detected
        );

        let detected = snapshot.heat_detected;
        self.snapshot = snapshot;
        detected
    }
}

/// March one ray outward in fixed steps and classify it.
fn march_ray(
    arena: &Arena,
    targets: &TargetField,
    cfg: &SensorConfig,
    origin: Point2,
    angle: f32,
) -> RayRecord {
    let mut last = origin;
    let mut hit_wall = false;
    let mut hit_obstacle = false;
    let mut clear_distance = 0.0_f32;
    let mut has_heat = false;
    let mut has_human = false;
    let mut detected: Option<TargetId> = None;

    let mut r = cfg.step_size;
    while r <= cfg.max_range {
        let sample = origin.point_at(angle, r);

        if arena.is_wall(sample) {
            hit_wall = true;
            break;
        }
        if arena.is_obstacle(sample) {
            hit_obstacle = true;
            if !cfg.see_through_obstacles {
                break;
            }
        }
        if !hit_obstacle {
            clear_distance = r;
        }

        // Heat pickup stops behind obstacles unless see-through is on.
        if !hit_obstacle || cfg.see_through_obstacles {
            for target in targets.iter() {
                if sample.distance(target.position) < cfg.detection_radius {
                    has_heat = true;
                    detected = Some(target.id);
                    if target.kind == TargetKind::Human {
                        has_human = true;
                    }
                }
            }
        }

        last = sample;
        r += cfg.step_size;
    }

    let class = if hit_wall {
        RayClass::Wall
    } else if hit_obstacle {
        RayClass::Obstacle
    } else {
        RayClass::Clear
    };

    RayRecord {
        angle,
        distance: origin.distance(last),
        clear_distance,
        quality: clear_distance / cfg.max_range,
        class,
        has_heat,
        has_human,
        target: detected,
    }
}
