//! Persisted maze format.
//!
//! ```json
//! {
//!   "map": [[0, 0, 0], [0, 4, 0], [0, 0, 0]],
//!   "rows": 3,
//!   "cols": 3,
//!   "start_point": null,
//!   "goal_point": [1, 1],
//!   "game_mode": "Solver"
//! }
//! ```
//!
//! Cell codes are those of [`CellKind::code`]: 0 wall, 1 path, 2 shortcut,
//! 3 start, 4 goal, 5 solution.

use std::fs;
use std::path::Path;

use maze_core::{CellKind, Grid, Maze, Position};
use serde::{Deserialize, Serialize};

use crate::{HostError, HostResult};

/// Largest maze file accepted by [`load_maze_file`].
const MAX_FILE_BYTES: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeFile {
    /// Full grid as nested rows of cell codes
    pub map: Vec<Vec<u8>>,
    pub rows: usize,
    pub cols: usize,
    /// `[row, col]`, `null` when no start has been placed
    pub start_point: Option<[usize; 2]>,
    /// `[row, col]`, `null` when no goal has been placed
    pub goal_point: Option<[usize; 2]>,
    /// Opaque to the maze core; carried through unchanged
    #[serde(default)]
    pub game_mode: String,
}

impl MazeFile {
    pub fn from_grid(
        grid: &Grid,
        start: Option<Position>,
        goal: Option<Position>,
        game_mode: impl Into<String>,
    ) -> Self {
        Self {
            map: grid.to_rows(),
            rows: grid.rows(),
            cols: grid.cols(),
            start_point: start.map(Into::into),
            goal_point: goal.map(Into::into),
            game_mode: game_mode.into(),
        }
    }

    pub fn from_maze(maze: &Maze) -> Self {
        Self::from_grid(&maze.grid, maze.start, maze.goal, maze.game_mode.as_str())
    }

    pub fn start(&self) -> Option<Position> {
        self.start_point.map(Position::from)
    }

    pub fn goal(&self) -> Option<Position> {
        self.goal_point.map(Position::from)
    }

    /// Decodes the map, checking it against `rows`/`cols` and the embedded points.
    pub fn to_grid(&self) -> HostResult<Grid> {
        let grid = Grid::from_rows(&self.map)?;
        if grid.rows() != self.rows || grid.cols() != self.cols {
            return Err(HostError::InvalidFile(format!(
                "declared size {}x{} does not match map size {}x{}",
                self.rows,
                self.cols,
                grid.rows(),
                grid.cols()
            )));
        }

        for (name, point) in [("start_point", self.start()), ("goal_point", self.goal())] {
            if let Some(pos) = point {
                if !grid.contains(pos) {
                    return Err(HostError::InvalidFile(format!(
                        "{} {} lies outside the {}x{} map",
                        name, pos, self.rows, self.cols
                    )));
                }
            }
        }

        Ok(grid)
    }

    /// Number of shortcut cells in the map.
    pub fn shortcut_count(&self) -> usize {
        let code = CellKind::Shortcut.code();
        self.map.iter().flatten().filter(|c| **c == code).count()
    }
}

pub fn save_maze_file(maze_file: &MazeFile, path: impl AsRef<Path>) -> HostResult<()> {
    let json = serde_json::to_string_pretty(maze_file)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_maze_file(path: impl AsRef<Path>) -> HostResult<MazeFile> {
    let path = path.as_ref();
    if fs::metadata(path)?.len() > MAX_FILE_BYTES {
        return Err(HostError::InvalidFile(format!(
            "{} is too large (max 10MB)",
            path.display()
        )));
    }

    let json = fs::read_to_string(path)?;
    let maze_file: MazeFile = serde_json::from_str(&json)?;
    maze_file.to_grid()?;
    Ok(maze_file)
}

/// Reads a JSON array of move codes (0=North, 1=East, 2=South, 3=West).
pub fn load_moves(path: impl AsRef<Path>) -> HostResult<Vec<u8>> {
    let json = fs::read_to_string(path)?;

    // Validate file size (prevent loading gigabytes into memory)
    if json.len() as u64 > MAX_FILE_BYTES {
        return Err(HostError::InvalidFile("moves file is too large (max 10MB)".into()));
    }

    let moves: Vec<u8> = serde_json::from_str(&json)?;

    if moves.is_empty() {
        return Err(HostError::InvalidFile("moves array is empty".into()));
    }

    if moves.len() > maze_core::MAX_MOVES {
        return Err(HostError::InvalidFile(format!(
            "too many moves: {} (max {})",
            moves.len(),
            maze_core::MAX_MOVES
        )));
    }

    Ok(moves)
}
