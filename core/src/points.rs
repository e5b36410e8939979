//! Caller-chosen start and goal positions.

use crate::error::Result;
use crate::grid::{CellKind, Grid, Position};

/// Default start when the caller's choice is unusable.
pub const DEFAULT_START: Position = Position::new(1, 1);

/// Default goal when the caller's choice is unusable.
pub fn default_goal(grid: &Grid) -> Position {
    Position::new(grid.rows() - 2, grid.cols() - 2)
}

/// Validates optional start/goal coordinates independently.
///
/// A coordinate is kept when it lies inside the grid on a `Path` or
/// `Shortcut` cell; otherwise the default for that field is returned.
/// The grid is not modified; use [`place_markers`] to write the markers.
pub fn set_custom_points(
    grid: &Grid,
    start: Option<Position>,
    goal: Option<Position>,
) -> (Position, Position) {
    let usable = |pos: Position| {
        matches!(
            grid.kind_at(pos),
            Some(CellKind::Path) | Some(CellKind::Shortcut)
        )
    };

    let start_used = start.filter(|p| usable(*p)).unwrap_or_else(|| {
        if let Some(p) = start {
            tracing::debug!("Start {} rejected, using default", p);
        }
        DEFAULT_START
    });
    let goal_used = goal.filter(|p| usable(*p)).unwrap_or_else(|| {
        if let Some(p) = goal {
            tracing::debug!("Goal {} rejected, using default", p);
        }
        default_goal(grid)
    });

    (start_used, goal_used)
}

/// Moves the start and goal markers.
///
/// Existing `Start`/`Goal` cells revert to `Path` before the new markers are
/// written. When `start == goal` the cell holds the goal marker.
pub fn place_markers(grid: &mut Grid, start: Position, goal: Position) -> Result<()> {
    grid.check(start)?;
    grid.check(goal)?;

    clear_markers(grid);
    grid.set(start, CellKind::Start)?;
    grid.set(goal, CellKind::Goal)?;
    Ok(())
}

/// Reverts every `Start`/`Goal` cell to `Path`.
pub fn clear_markers(grid: &mut Grid) {
    grid.replace_all(CellKind::Start, CellKind::Path);
    grid.replace_all(CellKind::Goal, CellKind::Path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MazeError;

    fn corridor() -> Grid {
        Grid::from_rows(&[
            vec![0u8, 0, 0, 0, 0],
            vec![0, 1, 2, 1, 0],
            vec![0, 0, 0, 1, 0],
            vec![0, 4, 1, 1, 0],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_points_kept() {
        let grid = corridor();
        let (start, goal) =
            set_custom_points(&grid, Some(Position::new(1, 2)), Some(Position::new(3, 2)));
        assert_eq!(start, Position::new(1, 2));
        assert_eq!(goal, Position::new(3, 2));
    }

    #[test]
    fn test_invalid_points_fall_back_independently() {
        let grid = corridor();

        // wall start, out-of-bounds goal
        let (start, goal) =
            set_custom_points(&grid, Some(Position::new(2, 1)), Some(Position::new(9, 9)));
        assert_eq!(start, Position::new(1, 1));
        assert_eq!(goal, Position::new(3, 3));

        // existing goal marker is not a usable cell
        let (start, goal) = set_custom_points(&grid, Some(Position::new(1, 3)), Some(Position::new(3, 1)));
        assert_eq!(start, Position::new(1, 3));
        assert_eq!(goal, Position::new(3, 3));

        assert_eq!(
            set_custom_points(&grid, None, None),
            (Position::new(1, 1), Position::new(3, 3))
        );
    }

    #[test]
    fn test_default_start_is_fixed() {
        assert_eq!(DEFAULT_START, Position::new(1, 1));

        // same fallback regardless of grid size
        let mut big = Grid::new(9, 9);
        big.set(Position::new(1, 1), CellKind::Path).unwrap();
        let (start, goal) = set_custom_points(&big, Some(Position::new(0, 4)), None);
        assert_eq!(start, DEFAULT_START);
        assert_eq!(goal, Position::new(7, 7));
        assert_eq!(set_custom_points(&corridor(), None, None).0, DEFAULT_START);
    }

    #[test]
    fn test_place_markers_moves_existing() {
        let mut grid = corridor();
        place_markers(&mut grid, Position::new(1, 1), Position::new(3, 3)).unwrap();

        assert_eq!(grid.kind_at(Position::new(3, 1)), Some(CellKind::Path));
        assert_eq!(grid.find(CellKind::Start), Some(Position::new(1, 1)));
        assert_eq!(grid.find(CellKind::Goal), Some(Position::new(3, 3)));
        assert_eq!(grid.count(CellKind::Goal), 1);
    }

    #[test]
    fn test_place_markers_out_of_bounds() {
        let mut grid = corridor();
        let err = place_markers(&mut grid, Position::new(1, 1), Position::new(5, 1)).unwrap_err();
        assert!(matches!(err, MazeError::OutOfBounds { row: 5, col: 1, .. }));
        // untouched on failure
        assert_eq!(grid, corridor());
    }
}
