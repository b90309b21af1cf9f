//! Per-tick behavior dispatch.
//!
//! The supervisor arbitrates between the four behaviors in fixed
//! priority order: manual drive, locked pursuit, rotation search,
//! exploration. It also runs the no-clear-path watchdog that escalates
//! a persistently blocked view into an in-place rotation scan.

use crate::arena::Arena;
use crate::config::{PatternConfig, SupervisorConfig};
use crate::core::{normalize_angle, Point2};
use crate::motion::MotionController;
use crate::patterns::MissionState;
use crate::sensor::Snapshot;
use crate::simulation::Mode;
use crate::status::MissionStatus;
use crate::target::{TargetField, TargetKind};
use crate::tracker::TargetTracker;
use rand::Rng;

/// Fraction of the remaining rotation error applied per tick during a
/// rotation scan.
const ROTATION_TURN_FACTOR: f32 = 0.15;

/// Operator drive flags for manual mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything a behavior step may read or command.
pub struct World<'a> {
    pub arena: &'a Arena,
    pub targets: &'a mut TargetField,
    pub snapshot: &'a Snapshot,
    pub tracker: &'a mut TargetTracker,
    pub mission: &'a mut MissionState,
    pub motion: &'a mut MotionController,
}

/// Result of one supervisor step.
pub struct StepOutcome {
    /// Status update, if this tick produced one.
    pub status: Option<MissionStatus>,
    /// Kinds captured this tick; the caller spawns replacements.
    pub captured: Vec<TargetKind>,
}

pub struct NavSupervisor {
    config: SupervisorConfig,
    rotation_active: bool,
    rotation_target: f32,
    no_path_counter: u32,
    last_rotation_eval_tick: u64,
    seeking_heat: bool,
}

impl NavSupervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            rotation_active: false,
            rotation_target: 0.0,
            no_path_counter: 0,
            last_rotation_eval_tick: 0,
            seeking_heat: false,
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn rotation_search_active(&self) -> bool {
        self.rotation_active
    }

    /// Once true, heat-bearing rays steer direction selection even in
    /// plain exploration. Set on the first lock, cleared on reset.
    pub fn seeking_heat(&self) -> bool {
        self.seeking_heat
    }

    pub fn reset(&mut self) {
        self.rotation_active = false;
        self.rotation_target = 0.0;
        self.no_path_counter = 0;
        self.last_rotation_eval_tick = 0;
        self.seeking_heat = false;
    }

    /// Heat rays participate in direction selection while in
    /// search-rescue mode or after the first lock.
    pub fn seeking(&self, mode: Mode) -> bool {
        mode == Mode::SearchRescue || self.seeking_heat
    }

    /// Run the watchdog and the highest-priority applicable behavior.
    pub fn step<R: Rng>(
        &mut self,
        world: &mut World<'_>,
        position: Point2,
        heading: f32,
        mode: Mode,
        manual: ManualInput,
        tick: u64,
        pattern_config: &PatternConfig,
        rng: &mut R,
    ) -> StepOutcome {
        let mut outcome = StepOutcome {
            status: None,
            captured: Vec::new(),
        };

        self.watch_for_no_path(world.snapshot, mode, heading, &mut outcome);

        if mode == Mode::Manual {
            self.drive_manual(world, position, heading, manual, &mut outcome);
        } else if let Some(id) = world.tracker.locked_target() {
            self.rotation_active = false;
            self.seeking_heat = true;
            self.pursue(world, id, position, &mut outcome);
        } else if self.rotation_active {
            self.rotate_and_scan(world, heading, tick, &mut outcome);
        } else if world.mission.exploring() {
            self.explore(world, position, heading, mode, pattern_config, rng, &mut outcome);
        }

        outcome
    }

    fn watch_for_no_path(
        &mut self,
        snapshot: &Snapshot,
        mode: Mode,
        heading: f32,
        outcome: &mut StepOutcome,
    ) {
        if snapshot.clear.is_empty() && !self.rotation_active && mode != Mode::Manual {
            self.no_path_counter += 1;
            if self.no_path_counter > self.config.no_path_ticks {
                log::warn!(
                    "no clear path for {} ticks, starting rotation search",
                    self.no_path_counter
                );
                self.rotation_active = true;
                self.rotation_target = heading + self.config.rotation_increment;
                self.no_path_counter = 0;
                outcome.status = Some(MissionStatus::NoClearPath);
            }
        } else if !snapshot.clear.is_empty() {
            self.no_path_counter = 0;
            if self.rotation_active {
                self.rotation_active = false;
                outcome.status = Some(MissionStatus::ClearPathFound);
            }
        }
    }

    fn drive_manual(
        &mut self,
        world: &mut World<'_>,
        position: Point2,
        heading: f32,
        manual: ManualInput,
        outcome: &mut StepOutcome,
    ) {
        let mut angle = heading;
        if manual.left {
            angle -= self.config.manual_turn_rate;
        }
        if manual.right {
            angle += self.config.manual_turn_rate;
        }
        world.motion.update_heading(angle);

        let speed = world.motion.config().speed * self.config.manual_speed_multiplier;
        let mut step = 0.0;
        if manual.forward {
            step += speed;
        }
        if manual.backward {
            step -= speed;
        }
        if step != 0.0 {
            let next = position.point_at(angle, step);
            world.motion.update_target(world.arena, next, angle);
        }

        // Driving over a target still collects it
        self.capture_nearby(world, position, 1, &mut outcome.captured);
    }

    fn pursue(
        &mut self,
        world: &mut World<'_>,
        id: crate::target::TargetId,
        position: Point2,
        outcome: &mut StepOutcome,
    ) {
        let target = match world.targets.get(id) {
            Some(t) => *t,
            None => return,
        };
        let distance = position.distance(target.position);
        let capture_radius = world.tracker.config().capture_radius;

        if distance <= capture_radius {
            world.targets.remove(id);
            world.tracker.clear();
            world.mission.set_exploring(true);
            outcome.captured.push(target.kind);
            outcome.status = Some(MissionStatus::Captured(target.kind));
            log::info!("captured {} at {:.1}m", target.kind.label(), distance);
            return;
        }

        let bearing = position.angle_to(target.position);
        let multiplier = if target.kind == TargetKind::Human {
            self.config.human_speed_multiplier
        } else {
            self.config.target_speed_multiplier
        };
        let step = world.motion.config().speed * multiplier;

        // Prefer a confirmed clear ray near the bearing, then the
        // direct line if unblocked, then the best clear ray anywhere.
        let mut approach = world
            .snapshot
            .clear_ray_toward(bearing, self.config.approach_bearing_tolerance)
            .map(|r| r.angle);
        if approach.is_none() && !world.arena.is_blocked(position.point_at(bearing, step)) {
            approach = Some(bearing);
        }
        if approach.is_none() {
            approach = world.snapshot.clear.first().map(|r| r.angle);
        }

        if let Some(angle) = approach {
            let next = position.point_at(angle, step);
            world.motion.update_target(world.arena, next, angle);
        }
        outcome.status = Some(MissionStatus::Approaching(target.kind, distance));
    }

    fn rotate_and_scan(
        &mut self,
        world: &mut World<'_>,
        heading: f32,
        tick: u64,
        outcome: &mut StepOutcome,
    ) {
        let error = normalize_angle(self.rotation_target - heading);
        world
            .motion
            .update_heading(heading + error * ROTATION_TURN_FACTOR);

        let settled = error.abs() < self.config.rotation_error_tolerance;
        let opened_up = world.snapshot.clear.len() > self.config.rotation_resume_clear_count;
        if !settled && !opened_up {
            return;
        }
        if tick.saturating_sub(self.last_rotation_eval_tick) <= self.config.rotation_dwell_ticks {
            return;
        }
        self.last_rotation_eval_tick = tick;

        if !world.snapshot.clear.is_empty() {
            self.rotation_active = false;
            world.mission.set_exploring(true);
            outcome.status = Some(MissionStatus::ClearPathFound);
        } else {
            // Still boxed in: extend the sweep and keep turning
            self.rotation_target += self.config.rotation_extension;
            outcome.status = Some(MissionStatus::ContinuingRotation);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn explore<R: Rng>(
        &mut self,
        world: &mut World<'_>,
        position: Point2,
        heading: f32,
        mode: Mode,
        pattern_config: &PatternConfig,
        rng: &mut R,
        outcome: &mut StepOutcome,
    ) {
        // Incidental pickups while sweeping, no status change
        self.capture_nearby(world, position, usize::MAX, &mut outcome.captured);

        let seeking = self.seeking(mode);
        let status = world.mission.step(
            world.arena,
            world.snapshot,
            position,
            heading,
            world.motion,
            pattern_config,
            seeking,
            rng,
        );
        if status.is_some() {
            outcome.status = status;
        }
    }

    /// Remove up to `limit` targets within the capture radius.
    fn capture_nearby(
        &self,
        world: &mut World<'_>,
        position: Point2,
        limit: usize,
        captured: &mut Vec<TargetKind>,
    ) {
        let radius = world.tracker.config().capture_radius;
        loop {
            if captured.len() >= limit {
                break;
            }
            let hit = world
                .targets
                .iter()
                .find(|t| position.distance(t.position) < radius)
                .map(|t| t.id);
            match hit {
                Some(id) => {
                    if let Some(target) = world.targets.remove(id) {
                        log::info!("collected {} in passing", target.kind.label());
                        captured.push(target.kind);
                    }
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::patterns::Pattern;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        arena: Arena,
        targets: TargetField,
        snapshot: Snapshot,
        tracker: TargetTracker,
        mission: MissionState,
        motion: MotionController,
        supervisor: NavSupervisor,
        rng: StdRng,
        config: SimConfig,
    }

    fn make_fixture() -> Fixture {
        let config = SimConfig::default();
        let arena = Arena::new(&config.arena);
        let mission = MissionState::new(Pattern::RandomPatrol, &arena, &config.patterns);
        Fixture {
            targets: TargetField::new(),
            snapshot: Snapshot::default(),
            tracker: TargetTracker::new(config.tracker.clone()),
            mission,
            motion: MotionController::new(config.motion.clone(), Point2::ZERO, 0.0),
            supervisor: NavSupervisor::new(config.supervisor.clone()),
            rng: StdRng::seed_from_u64(3),
            arena,
            config,
        }
    }

    fn step(fx: &mut Fixture, mode: Mode, manual: ManualInput, tick: u64) -> StepOutcome {
        let mut world = World {
            arena: &fx.arena,
            targets: &mut fx.targets,
            snapshot: &fx.snapshot,
            tracker: &mut fx.tracker,
            mission: &mut fx.mission,
            motion: &mut fx.motion,
        };
        fx.supervisor.step(
            &mut world,
            Point2::ZERO,
            0.0,
            mode,
            manual,
            tick,
            &fx.config.patterns,
            &mut fx.rng,
        )
    }

    #[test]
    fn test_watchdog_escalates_after_threshold() {
        let mut fx = make_fixture();
        // Empty snapshot means zero clear rays every tick
        for tick in 0..15 {
            let outcome = step(&mut fx, Mode::Auto, ManualInput::default(), tick);
            assert!(!fx.supervisor.rotation_search_active(), "tick {}", tick);
            assert_ne!(outcome.status, Some(MissionStatus::NoClearPath));
        }
        let outcome = step(&mut fx, Mode::Auto, ManualInput::default(), 15);
        assert!(fx.supervisor.rotation_search_active());
        assert_eq!(outcome.status, Some(MissionStatus::NoClearPath));
    }

    #[test]
    fn test_watchdog_ignores_manual_mode() {
        let mut fx = make_fixture();
        for tick in 0..100 {
            step(&mut fx, Mode::Manual, ManualInput::default(), tick);
        }
        assert!(!fx.supervisor.rotation_search_active());
    }

    #[test]
    fn test_manual_turn_and_drive() {
        let mut fx = make_fixture();
        let input = ManualInput {
            forward: true,
            right: true,
            ..ManualInput::default()
        };
        step(&mut fx, Mode::Manual, input, 0);

        let expected_angle = 0.12;
        assert!((fx.motion.commanded_heading() - expected_angle).abs() < 1e-5);
        let expected = Point2::ZERO.point_at(expected_angle, 0.15 * 2.0);
        assert!(fx.motion.commanded_position().distance(expected) < 1e-5);
    }

    #[test]
    fn test_manual_capture_on_contact() {
        let mut fx = make_fixture();
        fx.targets.spawn(TargetKind::Animal, Point2::new(1.0, 0.0));
        let outcome = step(&mut fx, Mode::Manual, ManualInput::default(), 0);
        assert_eq!(outcome.captured, vec![TargetKind::Animal]);
        assert!(fx.targets.is_empty());
    }

    #[test]
    fn test_pursuit_and_capture_clear_lock() {
        let mut fx = make_fixture();
        let id = fx.targets.spawn(TargetKind::Human, Point2::new(4.0, 0.0));
        fx.tracker
            .update(&fx.targets, &fx.snapshot, Point2::ZERO, true);
        assert_eq!(fx.tracker.locked_target(), Some(id));

        // Out of capture range: approaching status, commanded pose moves
        let outcome = step(&mut fx, Mode::Auto, ManualInput::default(), 0);
        assert_eq!(
            outcome.status,
            Some(MissionStatus::Approaching(TargetKind::Human, 4.0))
        );
        assert!(fx.motion.commanded_position().x > 0.0);

        // Within capture range
        let mut world = World {
            arena: &fx.arena,
            targets: &mut fx.targets,
            snapshot: &fx.snapshot,
            tracker: &mut fx.tracker,
            mission: &mut fx.mission,
            motion: &mut fx.motion,
        };
        let outcome = fx.supervisor.step(
            &mut world,
            Point2::new(2.0, 0.0),
            0.0,
            Mode::Auto,
            ManualInput::default(),
            1,
            &fx.config.patterns,
            &mut fx.rng,
        );
        assert_eq!(
            outcome.status,
            Some(MissionStatus::Captured(TargetKind::Human))
        );
        assert_eq!(outcome.captured, vec![TargetKind::Human]);
        assert!(fx.tracker.locked_target().is_none());
        assert!(fx.targets.is_empty());
        assert!(fx.supervisor.seeking_heat());
    }

    #[test]
    fn test_rotation_scan_extends_when_still_blocked() {
        let mut fx = make_fixture();
        fx.supervisor.rotation_active = true;
        fx.supervisor.rotation_target = 0.05; // already nearly aligned
        fx.supervisor.last_rotation_eval_tick = 0;

        let tick = fx.config.supervisor.rotation_dwell_ticks + 1;
        let before = fx.supervisor.rotation_target;
        let outcome = step(&mut fx, Mode::Auto, ManualInput::default(), tick);
        assert_eq!(outcome.status, Some(MissionStatus::ContinuingRotation));
        assert!(fx.supervisor.rotation_target > before);
        assert!(fx.supervisor.rotation_search_active());
    }

    #[test]
    fn test_rotation_scan_resumes_on_clear_path() {
        let mut fx = make_fixture();
        fx.supervisor.rotation_active = true;
        fx.supervisor.rotation_target = 0.05;
        fx.mission.set_exploring(false);
        fx.snapshot.clear.push(crate::sensor::RayRecord {
            angle: 0.0,
            distance: 10.0,
            clear_distance: 10.0,
            quality: 0.7,
            class: crate::sensor::RayClass::Clear,
            has_heat: false,
            has_human: false,
            target: None,
        });

        let outcome = step(&mut fx, Mode::Auto, ManualInput::default(), 0);
        // The watchdog sees clear rays and cancels the scan directly
        assert_eq!(outcome.status, Some(MissionStatus::ClearPathFound));
        assert!(!fx.supervisor.rotation_search_active());
    }
}
