//! Spiral search: an outward spiral anchored at the start position.

use crate::arena::Arena;
use crate::config::PatternConfig;
use crate::core::{angle_within, Point2};
use crate::motion::MotionController;
use crate::sensor::Snapshot;

/// Spiral cursor state.
///
/// The anchor is set lazily on the first step so the spiral always
/// starts where the robot actually is. When the next spiral point is
/// unreachable the robot escapes along the best available direction
/// and a fresh, tighter spiral is re-anchored at the current position;
/// between re-anchors the radius strictly increases.
pub struct SpiralSearch {
    anchor: Option<Point2>,
    angle: f32,
    radius: f32,
}

impl SpiralSearch {
    pub fn new() -> Self {
        Self {
            anchor: None,
            angle: 0.0,
            radius: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn anchor(&self) -> Option<Point2> {
        self.anchor
    }

    fn reanchor(&mut self, position: Point2, radius: f32) {
        self.anchor = Some(position);
        self.angle = 0.0;
        self.radius = radius;
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
    ) {
        let anchor = match self.anchor {
            Some(a) => a,
            None => {
                self.reanchor(position, config.spiral_initial_radius);
                position
            }
        };

        self.angle += config.spiral_angle_step;
        self.radius += config.spiral_radius_growth;

        let next = Point2::new(
            anchor.x + self.angle.cos() * self.radius,
            anchor.y + self.angle.sin() * self.radius,
        );
        let bearing = position.angle_to(next);
        let reachable = snapshot.clear.iter().any(|r| {
            angle_within(r.angle, bearing, config.spiral_bearing_tolerance)
                && r.distance > config.spiral_min_clear
        });

        if reachable && !arena.is_blocked(next) {
            motion.update_target(arena, next, bearing);
        } else {
            // Escape, then start a tighter spiral from wherever we are
            let escape = motion.best_direction(snapshot, heading, seeking);
            let step = motion.config().speed * config.spiral_escape_multiplier;
            motion.update_target(arena, position.point_at(escape, step), escape);
            self.reanchor(position, config.spiral_reanchor_radius);
            log::debug!("spiral blocked, re-anchored at ({:.1}, {:.1})", position.x, position.y);
        }
    }
}

impl Default for SpiralSearch {
    fn default() -> Self {
        Self::new()
    }
}
