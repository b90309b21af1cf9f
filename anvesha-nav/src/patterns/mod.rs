//! Coverage patterns for autonomous exploration.
//!
//! Four patterns share one contract: given the current perception
//! snapshot and pose, write the next commanded pose through the motion
//! controller and optionally update the mission status. Patterns that
//! track completion (grid, perimeter) clear the exploring flag when
//! done; the open-ended patterns (spiral, patrol) run until the
//! operator intervenes.

mod grid;
mod patrol;
mod perimeter;
mod spiral;

pub use grid::GridSweep;
pub use patrol::RandomPatrol;
pub use perimeter::PerimeterSweep;
pub use spiral::SpiralSearch;

use crate::arena::Arena;
use crate::config::PatternConfig;
use crate::core::Point2;
use crate::motion::MotionController;
use crate::sensor::Snapshot;
use crate::status::MissionStatus;
use rand::Rng;
use std::str::FromStr;

/// The selectable coverage patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    GridSweep,
    SpiralSearch,
    PerimeterSweep,
    RandomPatrol,
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::GridSweep => "grid",
            Pattern::SpiralSearch => "spiral",
            Pattern::PerimeterSweep => "perimeter",
            Pattern::RandomPatrol => "random",
        }
    }
}

impl FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Pattern::GridSweep),
            "spiral" => Ok(Pattern::SpiralSearch),
            "perimeter" => Ok(Pattern::PerimeterSweep),
            "random" => Ok(Pattern::RandomPatrol),
            other => Err(format!(
                "unknown pattern '{}', expected grid|spiral|perimeter|random",
                other
            )),
        }
    }
}

/// Active pattern plus all per-pattern exploration state.
pub struct MissionState {
    pattern: Pattern,
    exploring: bool,
    grid: GridSweep,
    spiral: SpiralSearch,
    perimeter: PerimeterSweep,
    patrol: RandomPatrol,
}

impl MissionState {
    pub fn new(pattern: Pattern, arena: &Arena, config: &PatternConfig) -> Self {
        Self {
            pattern,
            exploring: true,
            grid: GridSweep::plan(arena, config),
            spiral: SpiralSearch::new(),
            perimeter: PerimeterSweep::plan(arena, config),
            patrol: RandomPatrol::new(),
        }
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// False once a finite pattern has completed; the robot idles
    /// until the next reset.
    pub fn exploring(&self) -> bool {
        self.exploring
    }

    pub fn set_exploring(&mut self, exploring: bool) {
        self.exploring = exploring;
    }

    /// Grid coverage as a whole percentage. Only the grid sweep
    /// contributes to area coverage.
    pub fn coverage_percent(&self) -> u32 {
        self.grid.coverage_percent()
    }

    pub fn grid(&self) -> &GridSweep {
        &self.grid
    }

    pub fn spiral(&self) -> &SpiralSearch {
        &self.spiral
    }

    pub fn perimeter(&self) -> &PerimeterSweep {
        &self.perimeter
    }

    /// Switch pattern and replan from scratch.
    pub fn set_pattern(&mut self, pattern: Pattern, arena: &Arena, config: &PatternConfig) {
        self.pattern = pattern;
        self.reset(arena, config);
    }

    /// Replan every pattern and resume exploring.
    pub fn reset(&mut self, arena: &Arena, config: &PatternConfig) {
        self.grid = GridSweep::plan(arena, config);
        self.spiral = SpiralSearch::new();
        self.perimeter = PerimeterSweep::plan(arena, config);
        self.patrol = RandomPatrol::new();
        self.exploring = true;
        log::info!("pattern state reset, active pattern: {}", self.pattern.name());
    }

    /// Run one exploration step of the active pattern.
    ///
    /// Returns a status update when the pattern has something to say;
    /// `None` keeps the previous status on screen.
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
    ) -> Option<MissionStatus> {
        let status = match self.pattern {
            Pattern::GridSweep => self
                .grid
                .step(arena, snapshot, position, heading, motion, config, seeking),
            Pattern::SpiralSearch => {
                self.spiral
                    .step(arena, snapshot, position, heading, motion, config, seeking);
                None
            }
            Pattern::PerimeterSweep => {
                self.perimeter
                    .step(arena, snapshot, position, heading, motion, config, seeking)
            }
            Pattern::RandomPatrol => {
                self.patrol
                    .step(arena, snapshot, position, heading, motion, config, seeking, rng);
                None
            }
        };

        if matches!(
            status,
            Some(MissionStatus::GridComplete) | Some(MissionStatus::PerimeterComplete)
        ) {
            self.exploring = false;
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_parsing() {
        assert_eq!("grid".parse::<Pattern>().unwrap(), Pattern::GridSweep);
        assert_eq!("spiral".parse::<Pattern>().unwrap(), Pattern::SpiralSearch);
        assert_eq!(
            "perimeter".parse::<Pattern>().unwrap(),
            Pattern::PerimeterSweep
        );
        assert_eq!("random".parse::<Pattern>().unwrap(), Pattern::RandomPatrol);
        assert!("zigzag".parse::<Pattern>().is_err());
    }

    #[test]
    fn test_pattern_names_round_trip() {
        for pattern in [
            Pattern::GridSweep,
            Pattern::SpiralSearch,
            Pattern::PerimeterSweep,
            Pattern::RandomPatrol,
        ] {
            assert_eq!(pattern.name().parse::<Pattern>().unwrap(), pattern);
        }
    }
}
