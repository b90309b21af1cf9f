//! Perimeter sweep: circle the arena boundary at a fixed inset.

use crate::arena::Arena;
use crate::config::PatternConfig;
use crate::core::Point2;
use crate::motion::MotionController;
use crate::sensor::Snapshot;
use crate::status::MissionStatus;

/// Ring of waypoints inset from the walls, visited in angular order.
///
/// Movement is always along the best available direction; the
/// waypoints only gate progress, they are not steered at directly.
pub struct PerimeterSweep {
    waypoints: Vec<Point2>,
    cursor: usize,
}

impl PerimeterSweep {
    pub fn plan(arena: &Arena, config: &PatternConfig) -> Self {
        let radius = arena.half_extent() - config.perimeter_margin;
        let step = config.perimeter_step_deg.to_radians();
        let count = (std::f32::consts::TAU / step).round() as usize;

        let mut waypoints = Vec::with_capacity(count);
        for i in 0..count {
            let angle = i as f32 * step;
            let wp = Point2::new(radius * angle.cos(), radius * angle.sin());
            if !arena.is_blocked(wp) {
                waypoints.push(wp);
            }
        }
        log::debug!("perimeter planned: {} waypoints", waypoints.len());
        Self {
            waypoints,
            cursor: 0,
        }
    }

    pub fn waypoints(&self) -> &[Point2] {
        &self.waypoints
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn complete(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    pub fn progress_percent(&self) -> u32 {
        if self.waypoints.is_empty() {
            return 100;
        }
        ((self.cursor as f32 / self.waypoints.len() as f32) * 100.0).round() as u32
    }

    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        arena: &Arena,
        snapshot: &Snapshot,
        position: Point2,
        heading: f32,
        motion: &mut MotionController,
        config: &PatternConfig,
        seeking: bool,
    ) -> Option<MissionStatus> {
        if self.complete() {
            return Some(MissionStatus::PerimeterComplete);
        }

        let mut status = None;
        if position.distance(self.waypoints[self.cursor]) < config.perimeter_reach_radius {
            self.cursor += 1;
            status = Some(if self.complete() {
                MissionStatus::PerimeterComplete
            } else {
                MissionStatus::PerimeterProgress(self.progress_percent())
            });
        }

        if !self.complete() {
            let angle = motion.best_direction(snapshot, heading, seeking);
            let speed = motion.config().speed;
            motion.update_target(arena, position.point_at(angle, speed), angle);
        }

        status
    }
}
