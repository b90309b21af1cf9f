//! Configuration loading for Anvesha-Nav.

use crate::error::Result;
use serde::Deserialize;
use std::f32::consts::PI;
use std::path::Path;

/// Main configuration structure.
#[derive(Clone, Debug, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub supervisor: SupervisorConfig,

    /// RNG seed for placement and random patrol (default: 42)
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Arena geometry and entity placement.
#[derive(Clone, Debug, Deserialize)]
pub struct ArenaConfig {
    /// Arena side length in meters (default: 40.0)
    #[serde(default = "default_side_length")]
    pub side_length: f32,

    /// Wall proximity treated as a wall hit (default: 1.0)
    #[serde(default = "default_wall_margin")]
    pub wall_margin: f32,

    /// Clearance radius around obstacle centers (default: 2.5)
    #[serde(default = "default_obstacle_clearance")]
    pub obstacle_clearance: f32,

    /// Number of obstacles placed at setup (default: 4)
    #[serde(default = "default_obstacle_count")]
    pub obstacle_count: usize,

    /// Number of heat targets placed at setup (default: 4)
    #[serde(default = "default_target_count")]
    pub target_count: usize,

    /// Placement retry budget per entity (default: 30)
    #[serde(default = "default_placement_attempts")]
    pub placement_attempts: usize,

    /// Interior inset for robot spawn sampling (default: 3.0)
    #[serde(default = "default_spawn_inset")]
    pub spawn_inset: f32,

    /// Interior inset for obstacle sampling (default: 6.0)
    #[serde(default = "default_obstacle_inset")]
    pub obstacle_inset: f32,

    /// Minimum obstacle distance to robot spawn and walls (default: 5.0)
    #[serde(default = "default_obstacle_gap")]
    pub obstacle_gap: f32,

    /// Interior inset for target sampling (default: 5.0)
    #[serde(default = "default_target_inset")]
    pub target_inset: f32,

    /// Minimum target distance to the robot (default: 4.0)
    #[serde(default = "default_target_robot_gap")]
    pub target_robot_gap: f32,

    /// Minimum target distance to any obstacle (default: 5.0)
    #[serde(default = "default_target_obstacle_gap")]
    pub target_obstacle_gap: f32,
}

/// Ray-fan sensor parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct SensorConfig {
    /// Field of view in radians (default: 2*PI/3)
    #[serde(default = "default_fov")]
    pub fov: f32,

    /// Number of rays across the field of view (default: 140)
    #[serde(default = "default_num_rays")]
    pub num_rays: usize,

    /// Maximum ray range in meters (default: 15.0)
    #[serde(default = "default_max_range")]
    pub max_range: f32,

    /// Ray march step in meters (default: 0.15)
    #[serde(default = "default_step_size")]
    pub step_size: f32,

    /// Heat pickup radius around each sampled point (default: 2.5)
    #[serde(default = "default_detection_radius")]
    pub detection_radius: f32,

    /// Radius of the unconditional close-range heat check (default: 8.0)
    #[serde(default = "default_near_detect_radius")]
    pub near_detect_radius: f32,

    /// Minimum wall-clock interval between scans (default: 60)
    #[serde(default = "default_min_scan_interval_ms")]
    pub min_scan_interval_ms: u64,

    /// Rays keep sensing heat past obstacles when set (default: false)
    #[serde(default)]
    pub see_through_obstacles: bool,

    /// Quality threshold for the best-path bucket (default: 0.6)
    #[serde(default = "default_best_path_quality")]
    pub best_path_quality: f32,

    /// Quality threshold for the emergency-exit bucket (default: 0.8)
    #[serde(default = "default_emergency_quality")]
    pub emergency_quality: f32,
}

/// Target tracking and lock-on parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct TrackerConfig {
    /// Maximum target consideration range (default: 20.0)
    #[serde(default = "default_detection_range")]
    pub detection_range: f32,

    /// Targets inside this radius are always visible (default: 5.0)
    #[serde(default = "default_always_detect_radius")]
    pub always_detect_radius: f32,

    /// Ray bearing tolerance for visibility (default: PI/4)
    #[serde(default = "default_bearing_tolerance")]
    pub bearing_tolerance: f32,

    /// Same-priority re-lock requires at least this much distance
    /// improvement (default: 1.0)
    #[serde(default = "default_lock_distance_margin")]
    pub lock_distance_margin: f32,

    /// Capture radius in meters (default: 2.5)
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f32,
}

/// Motion smoothing and stuck detection.
#[derive(Clone, Debug, Deserialize)]
pub struct MotionConfig {
    /// Base linear speed per tick (default: 0.15)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Exponential smoothing factor toward the commanded pose (default: 0.25)
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f32,

    /// Per-tick displacement below this counts as stuck (default: 0.02)
    #[serde(default = "default_stuck_epsilon")]
    pub stuck_epsilon: f32,

    /// Stuck ticks before the emergency maneuver engages (default: 40)
    #[serde(default = "default_stuck_ticks")]
    pub stuck_ticks: u32,

    /// Fallback rotation when no direction is available (default: PI/6)
    #[serde(default = "default_fallback_rotation")]
    pub fallback_rotation: f32,
}

/// Coverage pattern parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct PatternConfig {
    /// Grid cell spacing in meters (default: 5.0)
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f32,

    /// Interior inset of the grid (default: 3.0)
    #[serde(default = "default_grid_margin")]
    pub grid_margin: f32,

    /// Radius at which a grid cell counts as searched (default: 2.0)
    #[serde(default = "default_grid_reach_radius")]
    pub grid_reach_radius: f32,

    /// Clear-ray bearing tolerance toward the next cell (default: PI/3)
    #[serde(default = "default_grid_bearing_tolerance")]
    pub grid_bearing_tolerance: f32,

    /// Initial spiral radius (default: 2.0)
    #[serde(default = "default_spiral_initial_radius")]
    pub spiral_initial_radius: f32,

    /// Spiral radius growth per tick (default: 0.05)
    #[serde(default = "default_spiral_radius_growth")]
    pub spiral_radius_growth: f32,

    /// Spiral angle increment per tick (default: 0.08)
    #[serde(default = "default_spiral_angle_step")]
    pub spiral_angle_step: f32,

    /// Radius of the re-anchored spiral after an escape (default: 1.5)
    #[serde(default = "default_spiral_reanchor_radius")]
    pub spiral_reanchor_radius: f32,

    /// Clear-ray bearing tolerance toward the spiral point (default: PI/2.5)
    #[serde(default = "default_spiral_bearing_tolerance")]
    pub spiral_bearing_tolerance: f32,

    /// Minimum clear-ray length toward the spiral point (default: 2.5)
    #[serde(default = "default_spiral_min_clear")]
    pub spiral_min_clear: f32,

    /// Escape step length as a speed multiple (default: 3.0)
    #[serde(default = "default_spiral_escape_multiplier")]
    pub spiral_escape_multiplier: f32,

    /// Perimeter ring inset from the walls (default: 4.0)
    #[serde(default = "default_perimeter_margin")]
    pub perimeter_margin: f32,

    /// Angular spacing of perimeter waypoints in degrees (default: 20.0)
    #[serde(default = "default_perimeter_step_deg")]
    pub perimeter_step_deg: f32,

    /// Radius at which a perimeter waypoint counts as visited (default: 2.5)
    #[serde(default = "default_perimeter_reach_radius")]
    pub perimeter_reach_radius: f32,

    /// Random patrol step budget lower bound (default: 50)
    #[serde(default = "default_patrol_min_steps")]
    pub patrol_min_steps: u32,

    /// Random patrol step budget spread above the bound (default: 70)
    #[serde(default = "default_patrol_extra_steps")]
    pub patrol_extra_steps: u32,

    /// Step budget lower bound after a blocked re-pick (default: 20)
    #[serde(default = "default_patrol_retry_min_steps")]
    pub patrol_retry_min_steps: u32,

    /// Step budget spread after a blocked re-pick (default: 30)
    #[serde(default = "default_patrol_retry_extra_steps")]
    pub patrol_retry_extra_steps: u32,

    /// Clear-ray bearing tolerance along the patrol heading (default: PI/3)
    #[serde(default = "default_patrol_bearing_tolerance")]
    pub patrol_bearing_tolerance: f32,

    /// Minimum clear-ray length along the patrol heading (default: 2.0)
    #[serde(default = "default_patrol_min_clear")]
    pub patrol_min_clear: f32,
}

/// Supervisor state machine thresholds.
#[derive(Clone, Debug, Deserialize)]
pub struct SupervisorConfig {
    /// Consecutive no-clear-path ticks before rotation search (default: 15)
    #[serde(default = "default_no_path_ticks")]
    pub no_path_ticks: u32,

    /// Initial rotation target offset in radians (default: PI/4)
    #[serde(default = "default_rotation_increment")]
    pub rotation_increment: f32,

    /// Rotation target extension when still blocked (default: PI/3)
    #[serde(default = "default_rotation_extension")]
    pub rotation_extension: f32,

    /// Rotation error below which the scan is re-evaluated (default: 0.1)
    #[serde(default = "default_rotation_error_tolerance")]
    pub rotation_error_tolerance: f32,

    /// Clear-ray count that ends rotation search early (default: 2)
    #[serde(default = "default_rotation_resume_clear_count")]
    pub rotation_resume_clear_count: usize,

    /// Minimum ticks between rotation re-evaluations (default: 30)
    #[serde(default = "default_rotation_dwell_ticks")]
    pub rotation_dwell_ticks: u64,

    /// Manual turn rate in radians per tick (default: 0.12)
    #[serde(default = "default_manual_turn_rate")]
    pub manual_turn_rate: f32,

    /// Manual drive speed multiplier (default: 2.0)
    #[serde(default = "default_manual_speed_multiplier")]
    pub manual_speed_multiplier: f32,

    /// Pursuit speed multiplier for human targets (default: 2.5)
    #[serde(default = "default_human_speed_multiplier")]
    pub human_speed_multiplier: f32,

    /// Pursuit speed multiplier for other targets (default: 2.0)
    #[serde(default = "default_target_speed_multiplier")]
    pub target_speed_multiplier: f32,

    /// Clear-ray bearing tolerance toward a locked target (default: PI/2)
    #[serde(default = "default_approach_bearing_tolerance")]
    pub approach_bearing_tolerance: f32,
}

// Default value functions
fn default_seed() -> u64 {
    42
}
fn default_side_length() -> f32 {
    40.0
}
fn default_wall_margin() -> f32 {
    1.0
}
fn default_obstacle_clearance() -> f32 {
    2.5
}
fn default_obstacle_count() -> usize {
    4
}
fn default_target_count() -> usize {
    4
}
fn default_placement_attempts() -> usize {
    30
}
fn default_spawn_inset() -> f32 {
    3.0
}
fn default_obstacle_inset() -> f32 {
    6.0
}
fn default_obstacle_gap() -> f32 {
    5.0
}
fn default_target_inset() -> f32 {
    5.0
}
fn default_target_robot_gap() -> f32 {
    4.0
}
fn default_target_obstacle_gap() -> f32 {
    5.0
}

// Sensor defaults
fn default_fov() -> f32 {
    PI / 1.5
}
fn default_num_rays() -> usize {
    140
}
fn default_max_range() -> f32 {
    15.0
}
fn default_step_size() -> f32 {
    0.15
}
fn default_detection_radius() -> f32 {
    2.5
}
fn default_near_detect_radius() -> f32 {
    8.0
}
fn default_min_scan_interval_ms() -> u64 {
    60
}
fn default_best_path_quality() -> f32 {
    0.6
}
fn default_emergency_quality() -> f32 {
    0.8
}

// Tracker defaults
fn default_detection_range() -> f32 {
    20.0
}
fn default_always_detect_radius() -> f32 {
    5.0
}
fn default_bearing_tolerance() -> f32 {
    PI / 4.0
}
fn default_lock_distance_margin() -> f32 {
    1.0
}
fn default_capture_radius() -> f32 {
    2.5
}

// Motion defaults
fn default_speed() -> f32 {
    0.15
}
fn default_smoothing_factor() -> f32 {
    0.25
}
fn default_stuck_epsilon() -> f32 {
    0.02
}
fn default_stuck_ticks() -> u32 {
    40
}
fn default_fallback_rotation() -> f32 {
    PI / 6.0
}

// Pattern defaults
fn default_grid_spacing() -> f32 {
    5.0
}
fn default_grid_margin() -> f32 {
    3.0
}
fn default_grid_reach_radius() -> f32 {
    2.0
}
fn default_grid_bearing_tolerance() -> f32 {
    PI / 3.0
}
fn default_spiral_initial_radius() -> f32 {
    2.0
}
fn default_spiral_radius_growth() -> f32 {
    0.05
}
fn default_spiral_angle_step() -> f32 {
    0.08
}
fn default_spiral_reanchor_radius() -> f32 {
    1.5
}
fn default_spiral_bearing_tolerance() -> f32 {
    PI / 2.5
}
fn default_spiral_min_clear() -> f32 {
    2.5
}
fn default_spiral_escape_multiplier() -> f32 {
    3.0
}
fn default_perimeter_margin() -> f32 {
    4.0
}
fn default_perimeter_step_deg() -> f32 {
    20.0
}
fn default_perimeter_reach_radius() -> f32 {
    2.5
}
fn default_patrol_min_steps() -> u32 {
    50
}
fn default_patrol_extra_steps() -> u32 {
    70
}
fn default_patrol_retry_min_steps() -> u32 {
    20
}
fn default_patrol_retry_extra_steps() -> u32 {
    30
}
fn default_patrol_bearing_tolerance() -> f32 {
    PI / 3.0
}
fn default_patrol_min_clear() -> f32 {
    2.0
}

// Supervisor defaults
fn default_no_path_ticks() -> u32 {
    15
}
fn default_rotation_increment() -> f32 {
    PI / 4.0
}
fn default_rotation_extension() -> f32 {
    PI / 3.0
}
fn default_rotation_error_tolerance() -> f32 {
    0.1
}
fn default_rotation_resume_clear_count() -> usize {
    2
}
fn default_rotation_dwell_ticks() -> u64 {
    30
}
fn default_manual_turn_rate() -> f32 {
    0.12
}
fn default_manual_speed_multiplier() -> f32 {
    2.0
}
fn default_human_speed_multiplier() -> f32 {
    2.5
}
fn default_target_speed_multiplier() -> f32 {
    2.0
}
fn default_approach_bearing_tolerance() -> f32 {
    PI / 2.0
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            side_length: default_side_length(),
            wall_margin: default_wall_margin(),
            obstacle_clearance: default_obstacle_clearance(),
            obstacle_count: default_obstacle_count(),
            target_count: default_target_count(),
            placement_attempts: default_placement_attempts(),
            spawn_inset: default_spawn_inset(),
            obstacle_inset: default_obstacle_inset(),
            obstacle_gap: default_obstacle_gap(),
            target_inset: default_target_inset(),
            target_robot_gap: default_target_robot_gap(),
            target_obstacle_gap: default_target_obstacle_gap(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            num_rays: default_num_rays(),
            max_range: default_max_range(),
            step_size: default_step_size(),
            detection_radius: default_detection_radius(),
            near_detect_radius: default_near_detect_radius(),
            min_scan_interval_ms: default_min_scan_interval_ms(),
            see_through_obstacles: false,
            best_path_quality: default_best_path_quality(),
            emergency_quality: default_emergency_quality(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            detection_range: default_detection_range(),
            always_detect_radius: default_always_detect_radius(),
            bearing_tolerance: default_bearing_tolerance(),
            lock_distance_margin: default_lock_distance_margin(),
            capture_radius: default_capture_radius(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            smoothing_factor: default_smoothing_factor(),
            stuck_epsilon: default_stuck_epsilon(),
            stuck_ticks: default_stuck_ticks(),
            fallback_rotation: default_fallback_rotation(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            grid_spacing: default_grid_spacing(),
            grid_margin: default_grid_margin(),
            grid_reach_radius: default_grid_reach_radius(),
            grid_bearing_tolerance: default_grid_bearing_tolerance(),
            spiral_initial_radius: default_spiral_initial_radius(),
            spiral_radius_growth: default_spiral_radius_growth(),
            spiral_angle_step: default_spiral_angle_step(),
            spiral_reanchor_radius: default_spiral_reanchor_radius(),
            spiral_bearing_tolerance: default_spiral_bearing_tolerance(),
            spiral_min_clear: default_spiral_min_clear(),
            spiral_escape_multiplier: default_spiral_escape_multiplier(),
            perimeter_margin: default_perimeter_margin(),
            perimeter_step_deg: default_perimeter_step_deg(),
            perimeter_reach_radius: default_perimeter_reach_radius(),
            patrol_min_steps: default_patrol_min_steps(),
            patrol_extra_steps: default_patrol_extra_steps(),
            patrol_retry_min_steps: default_patrol_retry_min_steps(),
            patrol_retry_extra_steps: default_patrol_retry_extra_steps(),
            patrol_bearing_tolerance: default_patrol_bearing_tolerance(),
            patrol_min_clear: default_patrol_min_clear(),
        }
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            no_path_ticks: default_no_path_ticks(),
            rotation_increment: default_rotation_increment(),
            rotation_extension: default_rotation_extension(),
            rotation_error_tolerance: default_rotation_error_tolerance(),
            rotation_resume_clear_count: default_rotation_resume_clear_count(),
            rotation_dwell_ticks: default_rotation_dwell_ticks(),
            manual_turn_rate: default_manual_turn_rate(),
            manual_speed_multiplier: default_manual_speed_multiplier(),
            human_speed_multiplier: default_human_speed_multiplier(),
            target_speed_multiplier: default_target_speed_multiplier(),
            approach_bearing_tolerance: default_approach_bearing_tolerance(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            sensor: SensorConfig::default(),
            tracker: TrackerConfig::default(),
            motion: MotionConfig::default(),
            patterns: PatternConfig::default(),
            supervisor: SupervisorConfig::default(),
            seed: default_seed(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = SimConfig::default();
        assert_eq!(config.arena.side_length, 40.0);
        assert_eq!(config.sensor.num_rays, 140);
        assert_eq!(config.sensor.max_range, 15.0);
        assert_eq!(config.motion.stuck_ticks, 40);
        assert_eq!(config.tracker.capture_radius, 2.5);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let err = SimConfig::load(Path::new("/nonexistent/anvesha.toml")).unwrap_err();
        assert!(matches!(err, crate::error::NavError::Io(_)));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            [arena]
            side_length = 60.0

            [sensor]
            num_rays = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.arena.side_length, 60.0);
        assert_eq!(config.arena.obstacle_count, 4);
        assert_eq!(config.sensor.num_rays, 90);
        assert!((config.sensor.fov - PI / 1.5).abs() < 1e-6);
    }
}
