//! Maze generation and exhaustive solving.
//!
//! This crate provides the grid model, the recursive-backtracker generator
//! with shortcut injection, and the all-paths solver consumed by the host
//! library, the CLI and the API server. It performs no I/O.

pub mod config;
pub mod error;
pub mod grid;
pub mod maze_gen;
pub mod points;
pub mod rng;
pub mod solver;
pub mod walk;

// Re-export commonly used types for convenience
pub use config::{GameMode, MazeConfig, SearchOrder, SolverConfig};
pub use error::{MazeError, Result};
pub use grid::{is_traversable, CellKind, Direction, Grid, Position};
pub use maze_gen::{Maze, MazeGenerator};
pub use points::{place_markers, set_custom_points};
pub use rng::{MazeRng, SimpleLCG};
pub use solver::{annotate, solve, MazeSolver, SolveOutcome, SolvedPath, Solution, SolverState};
pub use walk::{verify_moves, Player, WalkOutcome};

/// Smallest accepted edge length
pub const MIN_MAZE_SIZE: usize = 3;

/// Largest accepted edge length
pub const MAX_MAZE_SIZE: usize = 50;

/// Shortcut target is `max(1, rows / DEFAULT_SHORTCUT_DIVISOR)`
pub const DEFAULT_SHORTCUT_DIVISOR: usize = 3;

/// Random attempts allowed while placing shortcuts
pub const DEFAULT_SHORTCUT_ATTEMPTS: usize = 200;

/// Maximum number of moves accepted by [`verify_moves`]
pub const MAX_MOVES: usize = 10_000;
