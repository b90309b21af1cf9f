//! The simulation context: world state plus the per-tick pipeline.

use crate::arena::Arena;
use crate::clock::{Clock, SystemClock};
use crate::config::SimConfig;
use crate::core::Point2;
use crate::motion::MotionController;
use crate::patterns::{MissionState, Pattern};
use crate::sensor::{Scanner, Snapshot};
use crate::status::MissionStatus;
use crate::supervisor::{ManualInput, NavSupervisor, World};
use crate::target::{TargetField, TargetKind};
use crate::tracker::{LockEvent, LockState, TargetTracker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;

/// Operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Autonomous exploration; heat steering only after the first lock.
    Auto,
    /// Operator drive via [`ManualInput`].
    Manual,
    /// Autonomous exploration with heat-bearing rays always steering.
    SearchRescue,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
            Mode::SearchRescue => "search-rescue",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Mode::Auto),
            "manual" => Ok(Mode::Manual),
            "search-rescue" => Ok(Mode::SearchRescue),
            other => Err(format!(
                "unknown mode '{}', expected auto|manual|search-rescue",
                other
            )),
        }
    }
}

/// Actual robot pose.
#[derive(Clone, Copy, Debug)]
pub struct RobotState {
    pub position: Point2,
    pub heading: f32,
}

/// Everything a caller needs to know about one tick.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick: u64,
    pub position: Point2,
    pub heading: f32,
    pub status: MissionStatus,
    pub coverage_percent: u32,
    pub targets_found: u32,
    pub heat_detected: bool,
    pub detected_kinds: Vec<TargetKind>,
}

/// Owns the arena, the robot and every engine component.
///
/// All state is private to the context; there are no globals and no
/// background threads. One call to [`Simulation::tick`] runs exactly
/// one decision cycle.
pub struct Simulation {
    config: SimConfig,
    arena: Arena,
    targets: TargetField,
    robot: RobotState,
    scanner: Scanner,
    tracker: TargetTracker,
    mission: MissionState,
    motion: MotionController,
    supervisor: NavSupervisor,
    mode: Mode,
    manual: ManualInput,
    rng: StdRng,
    clock: Box<dyn Clock>,
    tick: u64,
    targets_found: u32,
    status: MissionStatus,
    just_reset: bool,
}

impl Simulation {
    /// Build a simulation on the system clock.
    pub fn new(config: SimConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock::new()))
    }

    /// Build a simulation with an injected clock; tests drive a
    /// [`crate::clock::ManualClock`] through this.
    pub fn with_clock(config: SimConfig, clock: Box<dyn Clock>) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut arena = Arena::new(&config.arena);
        let spawn = arena.sample_spawn(&config.arena, &mut rng);
        arena.place_obstacles(&config.arena, spawn, &mut rng);

        let mut targets = TargetField::new();
        for _ in 0..config.arena.target_count {
            let kind = random_kind(&mut rng);
            let position = arena.sample_target_position(&config.arena, spawn, &mut rng);
            targets.spawn(kind, position);
        }

        let robot = RobotState {
            position: spawn,
            heading: 0.0,
        };
        log::info!(
            "simulation ready: spawn ({:.1}, {:.1}), {} obstacles, {} targets",
            spawn.x,
            spawn.y,
            arena.obstacles().len(),
            targets.len()
        );

        Self {
            scanner: Scanner::new(config.sensor.clone()),
            tracker: TargetTracker::new(config.tracker.clone()),
            mission: MissionState::new(Pattern::GridSweep, &arena, &config.patterns),
            motion: MotionController::new(config.motion.clone(), spawn, 0.0),
            supervisor: NavSupervisor::new(config.supervisor.clone()),
            mode: Mode::Auto,
            manual: ManualInput::default(),
            rng,
            clock,
            tick: 0,
            targets_found: 0,
            status: MissionStatus::Initializing,
            just_reset: false,
            config,
            arena,
            targets,
            robot,
        }
    }

    /// Run one decision cycle: scan, track, dispatch, smooth.
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        let now = self.clock.now_ms();

        self.scanner.scan(
            &self.arena,
            &self.targets,
            self.robot.position,
            self.robot.heading,
            now,
        );

        let event = self.tracker.update(
            &self.targets,
            self.scanner.snapshot(),
            self.robot.position,
            self.mode != Mode::Manual,
        );
        if let LockEvent::Acquired(id) = event {
            if let Some(target) = self.targets.get(id) {
                let dist = self.robot.position.distance(target.position);
                self.status = MissionStatus::Detected(target.kind, dist);
            }
        }

        // The tick right after a reset only re-perceives; commanded
        // and actual pose stay identical so the robot does not move.
        let skip_dispatch = std::mem::take(&mut self.just_reset);
        if !skip_dispatch {
            let mut world = World {
                arena: &self.arena,
                targets: &mut self.targets,
                snapshot: self.scanner.snapshot(),
                tracker: &mut self.tracker,
                mission: &mut self.mission,
                motion: &mut self.motion,
            };
            let outcome = self.supervisor.step(
                &mut world,
                self.robot.position,
                self.robot.heading,
                self.mode,
                self.manual,
                self.tick,
                &self.config.patterns,
                &mut self.rng,
            );
            if let Some(status) = outcome.status {
                self.status = status;
            }
            for _ in &outcome.captured {
                self.targets_found += 1;
                self.spawn_replacement();
            }
        }

        let (position, heading) =
            self.motion
                .smooth(self.robot.position, self.robot.heading, self.mode == Mode::Manual);
        self.robot = RobotState { position, heading };

        self.report()
    }

    fn report(&self) -> TickReport {
        let snapshot = self.scanner.snapshot();
        TickReport {
            tick: self.tick,
            position: self.robot.position,
            heading: self.robot.heading,
            status: self.status,
            coverage_percent: self.mission.coverage_percent(),
            targets_found: self.targets_found,
            heat_detected: snapshot.heat_detected,
            detected_kinds: snapshot.detected_kinds.clone(),
        }
    }

    fn spawn_replacement(&mut self) {
        let kind = random_kind(&mut self.rng);
        let position =
            self.arena
                .sample_target_position(&self.config.arena, self.robot.position, &mut self.rng);
        self.targets.spawn(kind, position);
    }

    /// Clear every transient movement state and replan the active
    /// pattern. The commanded pose is resynced onto the actual pose.
    pub fn reset_pattern_states(&mut self) {
        self.mission.reset(&self.arena, &self.config.patterns);
        self.after_reset();
    }

    fn after_reset(&mut self) {
        self.tracker.clear();
        self.supervisor.reset();
        self.motion.resync(self.robot.position, self.robot.heading);
        self.scanner.reset_gate();
        self.targets_found = 0;
        self.status = MissionStatus::Initializing;
        self.just_reset = true;
    }

    /// Switch the coverage pattern; implies a full reset.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.mission
            .set_pattern(pattern, &self.arena, &self.config.patterns);
        self.after_reset();
    }

    /// Switch operating mode; implies a full reset.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        log::info!("mode change: {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        self.manual = ManualInput::default();
        self.reset_pattern_states();
        self.status = if mode == Mode::Manual {
            MissionStatus::ManualControl
        } else {
            MissionStatus::Searching
        };
    }

    pub fn set_manual_input(&mut self, input: ManualInput) {
        self.manual = input;
    }

    /// Replace all targets with a fresh random set.
    pub fn respawn_targets(&mut self) {
        self.targets.clear();
        for _ in 0..self.config.arena.target_count {
            self.spawn_replacement();
        }
        self.tracker.clear();
    }

    /// Replace all obstacles; patterns replan around the new layout.
    pub fn respawn_obstacles(&mut self) {
        self.arena.clear_obstacles();
        let position = self.robot.position;
        self.arena
            .place_obstacles(&self.config.arena, position, &mut self.rng);
        self.reset_pattern_states();
    }

    // Test and UI hooks

    pub fn spawn_target(&mut self, kind: TargetKind, position: Point2) -> crate::target::TargetId {
        self.targets.spawn(kind, position)
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
        self.tracker.clear();
    }

    pub fn add_obstacle(&mut self, position: Point2, radius: f32) {
        self.arena.add_obstacle(position, radius);
    }

    pub fn clear_obstacles(&mut self) {
        self.arena.clear_obstacles();
    }

    pub fn set_robot_pose(&mut self, position: Point2, heading: f32) {
        self.robot = RobotState { position, heading };
        self.motion.resync(position, heading);
    }

    // Accessors

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn targets(&self) -> &TargetField {
        &self.targets
    }

    pub fn robot(&self) -> RobotState {
        self.robot
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pattern(&self) -> Pattern {
        self.mission.pattern()
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.scanner.snapshot()
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    pub fn lock_state(&self) -> LockState {
        self.tracker.state()
    }

    pub fn rotation_search_active(&self) -> bool {
        self.supervisor.rotation_search_active()
    }

    pub fn exploring(&self) -> bool {
        self.mission.exploring()
    }

    pub fn emergency(&self) -> bool {
        self.motion.emergency()
    }

    pub fn coverage_percent(&self) -> u32 {
        self.mission.coverage_percent()
    }

    pub fn targets_found(&self) -> u32 {
        self.targets_found
    }

    pub fn commanded_position(&self) -> Point2 {
        self.motion.commanded_position()
    }

    pub fn commanded_heading(&self) -> f32 {
        self.motion.commanded_heading()
    }
}

fn random_kind<R: Rng>(rng: &mut R) -> TargetKind {
    TargetKind::ALL[rng.gen_range(0..TargetKind::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn make_sim() -> (Simulation, ManualClock) {
        let clock = ManualClock::new();
        let sim = Simulation::with_clock(SimConfig::default(), Box::new(clock.clone()));
        (sim, clock)
    }

    #[test]
    fn test_setup_places_world() {
        let (sim, _) = make_sim();
        assert_eq!(sim.arena().obstacles().len(), 4);
        assert_eq!(sim.targets().len(), 4);
        assert!(!sim.arena().is_blocked(sim.robot().position));
    }

    #[test]
    fn test_tick_reports_advance() {
        let (mut sim, clock) = make_sim();
        let first = sim.tick();
        assert_eq!(first.tick, 1);
        clock.advance(100);
        let second = sim.tick();
        assert_eq!(second.tick, 2);
        assert_eq!(second.targets_found, 0);
    }

    #[test]
    fn test_reset_skips_one_dispatch() {
        let (mut sim, clock) = make_sim();
        for _ in 0..5 {
            clock.advance(100);
            sim.tick();
        }
        sim.reset_pattern_states();
        let pose = sim.robot();

        clock.advance(100);
        sim.tick();
        let after = sim.robot();
        assert!(pose.position.distance(after.position) < 1e-6);
        assert!((pose.heading - after.heading).abs() < 1e-6);

        // The following tick dispatches again and commands movement
        clock.advance(100);
        sim.tick();
        assert!(sim.commanded_position().distance(after.position) > 0.0
            || (sim.commanded_heading() - after.heading).abs() > 0.0);
    }

    #[test]
    fn test_reset_clears_mission_counters() {
        let (mut sim, clock) = make_sim();
        sim.clear_targets();
        sim.spawn_target(TargetKind::Animal, sim.robot().position + Point2::new(1.0, 0.0));
        clock.advance(100);
        sim.tick();
        assert_eq!(sim.targets_found(), 1);

        sim.reset_pattern_states();
        assert_eq!(sim.targets_found(), 0);
        assert_eq!(sim.status(), MissionStatus::Initializing);
    }

    #[test]
    fn test_reset_drops_scan_gate() {
        let (mut sim, _clock) = make_sim();
        sim.clear_obstacles();
        sim.clear_targets();
        sim.tick();

        // Same wall-clock instant: a rate-gated scan would keep the
        // stale snapshot and never see the new target.
        sim.set_robot_pose(Point2::ZERO, 0.0);
        sim.spawn_target(TargetKind::Human, Point2::new(10.0, 0.0));
        sim.reset_pattern_states();
        sim.tick();
        assert!(sim.lock_state().locked);
    }

    #[test]
    fn test_mode_switch_sets_status_and_clears_lock() {
        let (mut sim, _) = make_sim();
        sim.clear_targets();
        sim.spawn_target(TargetKind::Human, sim.robot().position + Point2::new(4.0, 0.0));
        sim.tick();
        assert!(sim.lock_state().locked);

        sim.set_mode(Mode::Manual);
        assert_eq!(sim.status(), MissionStatus::ManualControl);
        assert!(!sim.lock_state().locked);

        sim.set_mode(Mode::SearchRescue);
        assert_eq!(sim.status(), MissionStatus::Searching);
    }

    #[test]
    fn test_capture_spawns_replacement() {
        let (mut sim, clock) = make_sim();
        sim.clear_targets();
        sim.spawn_target(TargetKind::Animal, sim.robot().position + Point2::new(1.0, 0.0));

        clock.advance(100);
        sim.tick();
        assert_eq!(sim.targets_found(), 1);
        assert_eq!(sim.status(), MissionStatus::Captured(TargetKind::Animal));
        // A replacement target was spawned
        assert_eq!(sim.targets().len(), 1);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("auto".parse::<Mode>().unwrap(), Mode::Auto);
        assert_eq!("manual".parse::<Mode>().unwrap(), Mode::Manual);
        assert_eq!(
            "search-rescue".parse::<Mode>().unwrap(),
            Mode::SearchRescue
        );
        assert!("teleop".parse::<Mode>().is_err());
    }
}
