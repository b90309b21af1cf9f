//! Random patrol: straight walks of random length with re-picks when
//! the way ahead closes.

use crate::arena::Arena;
use crate::config::PatternConfig;
use crate::core::{angle_within, Point2};
use crate::motion::MotionController;
use crate::sensor::Snapshot;
use rand::Rng;

/// Current walk: a heading and a remaining step budget.
pub struct RandomPatrol {
    walk: Option<Walk>,
}

struct Walk {
    angle: f32,
    steps_left: u32,
}

impl RandomPatrol {
    pub fn new() -> Self {
        Self { walk: None }
    }

    pub fn current_heading(&self) -> Option<f32> {
        self.walk.as_ref().map(|w| w.angle)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn step<R: Rng>(
        &mut self,
        arena: &Arena,
        snapshot: &Snapshot,
        position: Point2,
        heading: f32,
        motion: &mut MotionController,
        config: &PatternConfig,
        seeking: bool,
        rng: &mut R,
    ) {
        if !matches!(&self.walk, Some(w) if w.steps_left > 0) {
            self.walk = None;
        }
        let walk = self.walk.get_or_insert_with(|| Walk {
            angle: motion.best_direction(snapshot, heading, seeking),
            steps_left: config.patrol_min_steps + rng.gen_range(0..=config.patrol_extra_steps),
        });
        let speed = motion.config().speed;
        let next = position.point_at(walk.angle, speed);

        let direction_clear = snapshot.clear.iter().any(|r| {
            angle_within(r.angle, walk.angle, config.patrol_bearing_tolerance)
                && r.distance > config.patrol_min_clear
        });

        if direction_clear && !arena.is_blocked(next) {
            motion.update_target(arena, next, walk.angle);
            walk.steps_left -= 1;
        } else {
            // Blocked: re-pick with a shorter budget
            walk.angle = motion.best_direction(snapshot, heading, seeking);
            walk.steps_left = config.patrol_retry_min_steps
                + rng.gen_range(0..=config.patrol_retry_extra_steps);
        }
    }
}

impl Default for RandomPatrol {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArenaConfig, MotionConfig};
    use crate::sensor::{RayClass, RayRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clear_ray(angle: f32) -> RayRecord {
        RayRecord {
            angle,
            distance: 15.0,
            clear_distance: 15.0,
            quality: 1.0,
            class: RayClass::Clear,
            has_heat: false,
            has_human: false,
            target: None,
        }
    }

    fn make_setup() -> (Arena, PatternConfig, MotionController, StdRng) {
        (
            Arena::new(&ArenaConfig::default()),
            PatternConfig::default(),
            MotionController::new(MotionConfig::default(), Point2::ZERO, 0.0),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_walk_holds_heading_while_clear() {
        let (arena, config, mut motion, mut rng) = make_setup();
        let snapshot = Snapshot {
            clear: vec![clear_ray(0.0)],
            best_paths: vec![clear_ray(0.0)],
            ..Snapshot::default()
        };
        let mut patrol = RandomPatrol::new();

        patrol.step(
            &arena, &snapshot, Point2::ZERO, 0.0, &mut motion, &config, false, &mut rng,
        );
        let first = patrol.current_heading().unwrap();
        for _ in 0..10 {
            patrol.step(
                &arena, &snapshot, Point2::ZERO, 0.0, &mut motion, &config, false, &mut rng,
            );
            assert_eq!(patrol.current_heading().unwrap(), first);
        }
    }

    #[test]
    fn test_blocked_walk_repicks() {
        let (arena, config, mut motion, mut rng) = make_setup();
        let mut patrol = RandomPatrol::new();

        // No clear rays at all: every step re-picks off the fallback
        // rotation, tracking the robot heading as it drifts
        patrol.step(
            &arena,
            &Snapshot::default(),
            Point2::ZERO,
            0.0,
            &mut motion,
            &config,
            false,
            &mut rng,
        );
        let offset = std::f32::consts::PI / 6.0;
        assert!((patrol.current_heading().unwrap() - offset).abs() < 1e-5);

        patrol.step(
            &arena,
            &Snapshot::default(),
            Point2::ZERO,
            1.0,
            &mut motion,
            &config,
            false,
            &mut rng,
        );
        assert!((patrol.current_heading().unwrap() - (1.0 + offset)).abs() < 1e-5);
    }
}
