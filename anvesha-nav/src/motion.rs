//! Motion smoothing, direction selection and stuck recovery.
//!
//! Behaviors never move the robot directly. They write a commanded
//! pose through [`MotionController::update_target`]; the controller
//! eases the actual pose toward it by a fixed smoothing factor each
//! tick and watches the realized displacement for stuck detection.

use crate::arena::Arena;
use crate::config::MotionConfig;
use crate::core::{lerp_angle, Point2};
use crate::sensor::Snapshot;

pub struct MotionController {
    config: MotionConfig,
    commanded_position: Point2,
    commanded_heading: f32,
    stuck_counter: u32,
    emergency: bool,
}

impl MotionController {
    pub fn new(config: MotionConfig, position: Point2, heading: f32) -> Self {
        Self {
            config,
            commanded_position: position,
            commanded_heading: heading,
            stuck_counter: 0,
            emergency: false,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn commanded_position(&self) -> Point2 {
        self.commanded_position
    }

    pub fn commanded_heading(&self) -> f32 {
        self.commanded_heading
    }

    /// The emergency maneuver is engaged after prolonged stuckness.
    pub fn emergency(&self) -> bool {
        self.emergency
    }

    pub fn stuck_ticks(&self) -> u32 {
        self.stuck_counter
    }

    /// Set the commanded pose. The position is rejected when blocked
    /// (wall or obstacle); the heading is always accepted.
    pub fn update_target(&mut self, arena: &Arena, position: Point2, heading: f32) {
        if !arena.is_blocked(position) {
            self.commanded_position = position;
        }
        self.commanded_heading = heading;
    }

    /// Set only the commanded heading, leaving the position in place.
    pub fn update_heading(&mut self, heading: f32) {
        self.commanded_heading = heading;
    }

    /// Snap the commanded pose onto the actual pose and clear the
    /// stuck state. Run on every pattern or mode change so the robot
    /// does not chase a stale command across the arena.
    pub fn resync(&mut self, position: Point2, heading: f32) {
        self.commanded_position = position;
        self.commanded_heading = heading;
        self.stuck_counter = 0;
        self.emergency = false;
    }

    /// Ease the actual pose one step toward the commanded pose and
    /// update the stuck state from the realized displacement.
    pub fn smooth(&mut self, position: Point2, heading: f32, manual: bool) -> (Point2, f32) {
        let factor = self.config.smoothing_factor;
        let next = Point2::new(
            position.x + (self.commanded_position.x - position.x) * factor,
            position.y + (self.commanded_position.y - position.y) * factor,
        );
        let next_heading = lerp_angle(heading, self.commanded_heading, factor);

        let displacement = position.distance(next);
        if displacement < self.config.stuck_epsilon && !manual {
            self.stuck_counter += 1;
            if self.stuck_counter > self.config.stuck_ticks && !self.emergency {
                log::warn!(
                    "no displacement for {} ticks, engaging emergency maneuver",
                    self.stuck_counter
                );
                self.emergency = true;
            }
        } else {
            self.stuck_counter = 0;
            self.emergency = false;
        }

        (next, next_heading)
    }

    /// Best drive bearing for this tick.
    ///
    /// Priority: human-bearing ray, then heat-bearing ray while
    /// seeking, then an emergency exit while the emergency maneuver is
    /// engaged, then the best-quality path, then any clear ray, then a
    /// fixed fallback rotation off the current heading.
    pub fn best_direction(&self, snapshot: &Snapshot, heading: f32, seeking: bool) -> f32 {
        if let Some(ray) = snapshot.human.first() {
            return ray.angle;
        }
        if seeking {
            if let Some(ray) = snapshot.heat.first() {
                return ray.angle;
            }
        }
        if self.emergency {
            if let Some(ray) = snapshot.emergency_exits.first() {
                return ray.angle;
            }
        }
        if let Some(ray) = snapshot.best_paths.first() {
            return ray.angle;
        }
        if let Some(ray) = snapshot.clear.first() {
            return ray.angle;
        }
        heading + self.config.fallback_rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::sensor::{RayClass, RayRecord};

    fn make_controller() -> MotionController {
        MotionController::new(MotionConfig::default(), Point2::ZERO, 0.0)
    }

    fn make_ray(angle: f32, quality: f32, has_heat: bool, has_human: bool) -> RayRecord {
        RayRecord {
            angle,
            distance: quality * 15.0,
            clear_distance: quality * 15.0,
            quality,
            class: RayClass::Clear,
            has_heat,
            has_human,
            target: None,
        }
    }

    #[test]
    fn test_blocked_command_rejected_heading_kept() {
        let arena = Arena::new(&ArenaConfig::default());
        let mut controller = make_controller();

        controller.update_target(&arena, Point2::new(25.0, 0.0), 1.0);
        assert_eq!(controller.commanded_position(), Point2::ZERO);
        assert_eq!(controller.commanded_heading(), 1.0);

        controller.update_target(&arena, Point2::new(5.0, 5.0), 2.0);
        assert_eq!(controller.commanded_position(), Point2::new(5.0, 5.0));
    }

    #[test]
    fn test_smoothing_converges() {
        let mut controller = make_controller();
        controller.commanded_position = Point2::new(4.0, 0.0);

        let (p1, _) = controller.smooth(Point2::ZERO, 0.0, false);
        assert!((p1.x - 1.0).abs() < 1e-5);
        let (p2, _) = controller.smooth(p1, 0.0, false);
        assert!((p2.x - 1.75).abs() < 1e-5);
    }

    #[test]
    fn test_heading_takes_shortest_path() {
        use std::f32::consts::PI;
        let mut controller = make_controller();
        controller.commanded_heading = -3.0;

        // From +3.0 to -3.0 the short way crosses pi: heading grows
        // past 3.0 instead of swinging back through zero
        let (_, h) = controller.smooth(Point2::ZERO, 3.0, false);
        let expected = 3.0 + 0.25 * (2.0 * PI - 6.0);
        assert!((h - expected).abs() < 1e-4);
    }

    #[test]
    fn test_stuck_counter_engages_emergency() {
        let mut controller = make_controller();
        // Commanded == actual, zero displacement every tick
        for _ in 0..40 {
            controller.smooth(Point2::ZERO, 0.0, false);
        }
        assert!(!controller.emergency());
        controller.smooth(Point2::ZERO, 0.0, false);
        assert!(controller.emergency());

        // Real movement clears the state
        controller.commanded_position = Point2::new(1.0, 0.0);
        controller.smooth(Point2::ZERO, 0.0, false);
        assert!(!controller.emergency());
        assert_eq!(controller.stuck_ticks(), 0);
    }

    #[test]
    fn test_manual_mode_never_counts_stuck() {
        let mut controller = make_controller();
        for _ in 0..100 {
            controller.smooth(Point2::ZERO, 0.0, true);
        }
        assert!(!controller.emergency());
        assert_eq!(controller.stuck_ticks(), 0);
    }

    #[test]
    fn test_direction_priority_order() {
        let mut controller = make_controller();
        let mut snapshot = Snapshot {
            clear: vec![make_ray(0.5, 0.4, false, false)],
            best_paths: vec![make_ray(0.4, 0.7, false, false)],
            emergency_exits: vec![make_ray(0.3, 0.9, false, false)],
            heat: vec![make_ray(0.2, 0.5, true, false)],
            human: vec![make_ray(0.1, 0.5, true, true)],
            ..Snapshot::default()
        };

        // Human wins over everything
        assert_eq!(controller.best_direction(&snapshot, 0.0, true), 0.1);

        // Heat only counts while seeking
        snapshot.human.clear();
        assert_eq!(controller.best_direction(&snapshot, 0.0, true), 0.2);
        assert_eq!(controller.best_direction(&snapshot, 0.0, false), 0.4);

        // Emergency exits only during the emergency maneuver
        snapshot.heat.clear();
        controller.emergency = true;
        assert_eq!(controller.best_direction(&snapshot, 0.0, true), 0.3);
        controller.emergency = false;

        snapshot.emergency_exits.clear();
        assert_eq!(controller.best_direction(&snapshot, 0.0, true), 0.4);
        snapshot.best_paths.clear();
        assert_eq!(controller.best_direction(&snapshot, 0.0, true), 0.5);
        snapshot.clear.clear();
        let fallback = controller.best_direction(&snapshot, 1.0, true);
        assert!((fallback - (1.0 + std::f32::consts::PI / 6.0)).abs() < 1e-5);
    }
}
