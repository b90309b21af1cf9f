//! Arena geometry: bounds, walls, and obstacle placement.

use crate::config::ArenaConfig;
use crate::core::Point2;
use rand::Rng;

/// A static circular obstacle.
#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    pub position: Point2,
    /// Effective clearance radius used by the blocked-point test.
    pub radius: f32,
}

/// The bounded square operating area.
///
/// Bounds are symmetric about the origin. A point counts as a wall hit
/// within `wall_margin` of the outer boundary, and as an obstacle hit
/// within the obstacle's clearance radius of its center.
pub struct Arena {
    half_extent: f32,
    wall_margin: f32,
    obstacles: Vec<Obstacle>,
}

impl Arena {
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            half_extent: config.side_length / 2.0,
            wall_margin: config.wall_margin,
            obstacles: Vec::new(),
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// True if the point lies within the wall margin of the boundary.
    pub fn is_wall(&self, p: Point2) -> bool {
        let limit = self.half_extent - self.wall_margin;
        p.x <= -limit || p.x >= limit || p.y <= -limit || p.y >= limit
    }

    /// True if the point lies within the clearance radius of any obstacle.
    pub fn is_obstacle(&self, p: Point2) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.position.distance(p) < o.radius)
    }

    /// Combined traversability test.
    pub fn is_blocked(&self, p: Point2) -> bool {
        self.is_wall(p) || self.is_obstacle(p)
    }

    /// Distance from a point to the nearest wall plane.
    pub fn wall_distance(&self, p: Point2) -> f32 {
        let h = self.half_extent;
        (p.x + h)
            .abs()
            .min((p.x - h).abs())
            .min((p.y + h).abs())
            .min((p.y - h).abs())
    }

    /// Sample a robot spawn point in the inset interior.
    pub fn sample_spawn<R: Rng>(&self, config: &ArenaConfig, rng: &mut R) -> Point2 {
        let span = self.half_extent - config.spawn_inset;
        Point2::new(rng.gen_range(-span..span), rng.gen_range(-span..span))
    }

    /// Place a single obstacle with a bounded retry budget.
    ///
    /// Sampling retries until the candidate is far enough from both the
    /// robot spawn and every wall. If the budget runs out the last
    /// sample is accepted anyway; that is a documented soft invariant,
    /// not a hard guarantee.
    pub fn place_obstacle<R: Rng>(&mut self, config: &ArenaConfig, robot: Point2, rng: &mut R) {
        let span = self.half_extent - config.obstacle_inset;
        let mut candidate = Point2::ZERO;

        let mut placed = false;
        for _ in 0..config.placement_attempts {
            candidate = Point2::new(rng.gen_range(-span..span), rng.gen_range(-span..span));
            if candidate.distance(robot) > config.obstacle_gap
                && self.wall_distance(candidate) > config.obstacle_gap
            {
                placed = true;
                break;
            }
        }
        if !placed {
            log::warn!(
                "Obstacle placement budget exhausted; accepting ({:.1}, {:.1})",
                candidate.x,
                candidate.y
            );
        }

        self.obstacles.push(Obstacle {
            position: candidate,
            radius: config.obstacle_clearance,
        });
    }

    /// Place the configured number of obstacles.
    pub fn place_obstacles<R: Rng>(&mut self, config: &ArenaConfig, robot: Point2, rng: &mut R) {
        self.obstacles.clear();
        for _ in 0..config.obstacle_count {
            self.place_obstacle(config, robot, rng);
        }
    }

    /// Add an obstacle at an explicit position.
    pub fn add_obstacle(&mut self, position: Point2, radius: f32) {
        self.obstacles.push(Obstacle { position, radius });
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Sample a target position with a bounded retry budget.
    ///
    /// Same retry tolerance as obstacle placement: the last sample wins
    /// if no candidate satisfies the spacing constraints.
    pub fn sample_target_position<R: Rng>(
        &self,
        config: &ArenaConfig,
        robot: Point2,
        rng: &mut R,
    ) -> Point2 {
        let span = self.half_extent - config.target_inset;
        let mut candidate = Point2::ZERO;

        for _ in 0..config.placement_attempts {
            candidate = Point2::new(rng.gen_range(-span..span), rng.gen_range(-span..span));

            let near_obstacle = self
                .obstacles
                .iter()
                .any(|o| o.position.distance(candidate) < config.target_obstacle_gap);

            if candidate.distance(robot) > config.target_robot_gap && !near_obstacle {
                return candidate;
            }
        }

        log::warn!(
            "Target placement budget exhausted; accepting ({:.1}, {:.1})",
            candidate.x,
            candidate.y
        );
        candidate
    }
}
