//! Host-side maze workflows: generation to a persisted file, solving a
//! persisted maze, and replaying a player's moves against one.

pub mod maze_file;
pub mod report;

use maze_core::points::clear_markers;
use maze_core::{
    place_markers, set_custom_points, verify_moves, MazeConfig, MazeError, MazeGenerator,
    MazeSolver, Position, SolverConfig, WalkOutcome,
};
use thiserror::Error;

pub use maze_file::{load_maze_file, load_moves, save_maze_file, MazeFile};
pub use report::{OutcomeKind, PathReport, SolveReport, WalkReport};

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file: {0}")]
    InvalidFile(String),
}

impl HostError {
    /// Whether the caller supplied bad input, as opposed to an internal failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            HostError::Maze(_) | HostError::Json(_) | HostError::InvalidFile(_)
        )
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// A freshly generated maze ready to be saved.
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    /// Seed the maze was generated from; reusing it reproduces the maze
    pub seed: u32,
    pub maze_file: MazeFile,
}

/// Generate a maze and package it in its persisted form.
///
/// When `config.seed` is unset a seed is drawn from the clock and reported
/// in [`GeneratedMaze::seed`].
///
/// # Example
/// ```no_run
/// use maze_core::MazeConfig;
/// use maze_host::{generate_maze, save_maze_file};
///
/// let generated = generate_maze(&MazeConfig::square(21).with_seed(42)).unwrap();
/// save_maze_file(&generated.maze_file, "42_maze.json").unwrap();
/// ```
pub fn generate_maze(config: &MazeConfig) -> HostResult<GeneratedMaze> {
    let mut generator = MazeGenerator::new(config.clone())?;
    let maze = generator.generate();
    let seed = maze.seed.ok_or_else(|| {
        HostError::Maze(MazeError::ConfigurationInvalid(
            "generator did not report a seed".into(),
        ))
    })?;

    tracing::info!(
        "Generated {}x{} maze from seed {} ({} shortcuts)",
        maze.grid.rows(),
        maze.grid.cols(),
        seed,
        maze.shortcuts.len()
    );

    Ok(GeneratedMaze {
        seed,
        maze_file: MazeFile::from_maze(&maze),
    })
}

/// Solve a persisted maze.
///
/// Start and goal come from the overrides when given, otherwise from the
/// file's `start_point`/`goal_point`. Overrides, and embedded points on a
/// wall, that do not land on a path or shortcut cell fall back to the
/// defaults of [`set_custom_points`].
/// A maze without a start or goal is reported as [`OutcomeKind::Missing`].
///
/// # Arguments
/// * `maze_file` - The maze to solve
/// * `start_override` - Replaces the file's start point
/// * `goal_override` - Replaces the file's goal point
/// * `config` - Search order and limits
pub fn solve_maze(
    maze_file: &MazeFile,
    start_override: Option<Position>,
    goal_override: Option<Position>,
    config: &SolverConfig,
) -> HostResult<SolveReport> {
    let mut grid = maze_file.to_grid()?;

    // Embedded points are trusted only when they land on a walkable cell
    let usable = |point: Option<Position>| point.map_or(true, |p| grid.is_traversable_at(p));
    let revalidate = start_override.is_some()
        || goal_override.is_some()
        || !usable(maze_file.start())
        || !usable(maze_file.goal());

    let start = start_override.or(maze_file.start());
    let goal = goal_override.or(maze_file.goal());

    let mut solver = match (start, goal) {
        (Some(start), Some(goal)) => {
            let (start, goal) = if revalidate {
                clear_markers(&mut grid);
                let (start, goal) = set_custom_points(&grid, Some(start), Some(goal));
                place_markers(&mut grid, start, goal)?;
                (start, goal)
            } else {
                (start, goal)
            };
            tracing::info!("Solving {}x{} maze from {} to {}", grid.rows(), grid.cols(), start, goal);
            MazeSolver::with_endpoints(&grid, start, goal, config.clone())?
        }
        _ => {
            tracing::info!("Maze file has no start or goal, solving by markers");
            MazeSolver::new(&grid, config.clone())
        }
    };

    let solution = solver.solve();
    let report = SolveReport::from(&solution);

    tracing::info!(
        "Solve finished: {} ({} paths, {} expansions)",
        report.outcome,
        report.paths.len(),
        report.expansions
    );

    Ok(report)
}

/// Replay `moves` from the maze's start point and report whether they reach its goal.
pub fn verify_moves_file(maze_file: &MazeFile, moves: &[u8]) -> HostResult<WalkOutcome> {
    let grid = maze_file.to_grid()?;
    let start = maze_file
        .start()
        .ok_or_else(|| HostError::InvalidFile("maze has no start_point".into()))?;
    let goal = maze_file
        .goal()
        .ok_or_else(|| HostError::InvalidFile("maze has no goal_point".into()))?;

    tracing::info!("Replaying {} moves from {} to {}", moves.len(), start, goal);
    let outcome = verify_moves(&grid, start, goal, moves)?;
    tracing::info!("Replay result: {:?}", outcome);

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_classification() {
        assert!(HostError::InvalidFile("x".into()).is_invalid_input());
        assert!(HostError::Maze(MazeError::ConfigurationInvalid("x".into())).is_invalid_input());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!HostError::Io(io).is_invalid_input());
    }

    #[test]
    fn test_generate_reports_seed() {
        let generated = generate_maze(&MazeConfig::square(9).with_seed(7)).unwrap();
        assert_eq!(generated.seed, 7);
        assert_eq!(generated.maze_file.rows, 9);
        assert_eq!(generated.maze_file.game_mode, "Classic");

        let unseeded = generate_maze(&MazeConfig::square(9)).unwrap();
        let again = generate_maze(&MazeConfig::square(9).with_seed(unseeded.seed)).unwrap();
        assert_eq!(unseeded.maze_file, again.maze_file);
    }

    #[test]
    fn test_generate_rejects_bad_size() {
        let err = generate_maze(&MazeConfig::square(51)).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
