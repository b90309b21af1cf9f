//! Grid sweep: visit a lattice of cells covering the arena interior.

use crate::arena::Arena;
use crate::config::PatternConfig;
use crate::core::Point2;
use crate::motion::MotionController;
use crate::sensor::Snapshot;
use crate::status::MissionStatus;

/// Lattice of unvisited cell centers with a cursor.
///
/// Cells are laid out column by column over the interior inset by the
/// grid margin; centers that fall inside an obstacle footprint are
/// dropped at planning time. Coverage is `cursor / cells` and is
/// monotone: the cursor only ever advances.
pub struct GridSweep {
    cells: Vec<Point2>,
    cursor: usize,
}

impl GridSweep {
    pub fn plan(arena: &Arena, config: &PatternConfig) -> Self {
        let half = arena.half_extent() - config.grid_margin;
        let mut cells = Vec::new();
        let mut x = -half;
        while x <= half + 1e-3 {
            let mut y = -half;
            while y <= half + 1e-3 {
                let cell = Point2::new(x, y);
                if !arena.is_blocked(cell) {
                    cells.push(cell);
                }
                y += config.grid_spacing;
            }
            x += config.grid_spacing;
        }
        log::debug!("grid planned: {} reachable cells", cells.len());
        Self { cells, cursor: 0 }
    }

    pub fn cells(&self) -> &[Point2] {
        &self.cells
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn complete(&self) -> bool {
        self.cursor >= self.cells.len()
    }

    pub fn coverage_percent(&self) -> u32 {
        if self.cells.is_empty() {
            return 100;
        }
        ((self.cursor as f32 / self.cells.len() as f32) * 100.0).round() as u32
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
            return Some(MissionStatus::GridComplete);
        }

        let mut status = None;
        if position.distance(self.cells[self.cursor]) < config.grid_reach_radius {
            self.cursor += 1;
            status = Some(if self.complete() {
                MissionStatus::GridComplete
            } else {
                MissionStatus::GridProgress(self.coverage_percent())
            });
        }

        if let Some(next) = self.cells.get(self.cursor) {
            let bearing = position.angle_to(*next);
            let speed = motion.config().speed;
            let angle = match snapshot.clear_ray_toward(bearing, config.grid_bearing_tolerance) {
                Some(ray) => ray.angle,
                None => motion.best_direction(snapshot, heading, seeking),
            };
            motion.update_target(arena, position.point_at(angle, speed), angle);
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArenaConfig, MotionConfig};

    fn make_setup() -> (Arena, PatternConfig, MotionController) {
        let arena = Arena::new(&ArenaConfig::default());
        let config = PatternConfig::default();
        let motion = MotionController::new(MotionConfig::default(), Point2::ZERO, 0.0);
        (arena, config, motion)
    }

    #[test]
    fn test_plan_covers_interior() {
        let (arena, config, _) = make_setup();
        let grid = GridSweep::plan(&arena, &config);
        // 40m arena, margin 3, spacing 5: 7 columns x 7 rows
        assert_eq!(grid.cells().len(), 49);
        for cell in grid.cells() {
            assert!(cell.x.abs() <= 17.0 + 1e-3);
            assert!(cell.y.abs() <= 17.0 + 1e-3);
        }
    }

    #[test]
    fn test_plan_skips_blocked_cells() {
        let (mut arena, config, _) = make_setup();
        let open = GridSweep::plan(&arena, &config).cells().len();
        arena.add_obstacle(Point2::new(-17.0, -17.0), 2.5);
        let blocked = GridSweep::plan(&arena, &config).cells().len();
        assert!(blocked < open);
    }

    #[test]
    fn test_arrival_advances_cursor_and_reports() {
        let (arena, config, mut motion) = make_setup();
        let mut grid = GridSweep::plan(&arena, &config);
        let first = grid.cells()[0];

        // Standing on the first cell: cursor advances, progress is reported
        let status = grid.step(
            &arena,
            &Snapshot::default(),
            first,
            0.0,
            &mut motion,
            &config,
            false,
        );
        assert_eq!(grid.cursor(), 1);
        assert_eq!(status, Some(MissionStatus::GridProgress(2)));
    }

    #[test]
    fn test_coverage_monotone_under_steps() {
        let (arena, config, mut motion) = make_setup();
        let mut grid = GridSweep::plan(&arena, &config);
        let mut last = grid.coverage_percent();
        for _ in 0..200 {
            // Jump the robot onto the next cell each step
            let position = grid
                .cells()
                .get(grid.cursor())
                .copied()
                .unwrap_or(Point2::ZERO);
            grid.step(
                &arena,
                &Snapshot::default(),
                position,
                0.0,
                &mut motion,
                &config,
                false,
            );
            let coverage = grid.coverage_percent();
            assert!(coverage >= last);
            last = coverage;
        }
        assert_eq!(last, 100);
        assert!(grid.complete());
    }
}
