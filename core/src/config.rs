//! Generator and solver configuration, passed explicitly by value.

use core::fmt;
use core::str::FromStr;

use crate::error::{MazeError, Result};
use crate::{DEFAULT_SHORTCUT_ATTEMPTS, DEFAULT_SHORTCUT_DIVISOR, MAX_MAZE_SIZE, MIN_MAZE_SIZE};

/// How the caller intends to play the maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Start is placed at random during generation.
    #[default]
    Classic,
    /// Start is left for the caller to pick.
    Solver,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Solver => "Solver",
        }
    }
}

impl FromStr for GameMode {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Classic" | "classic" => Ok(GameMode::Classic),
            "Solver" | "solver" => Ok(GameMode::Solver),
            _ => Err(MazeError::ConfigurationInvalid(format!(
                "unknown game mode '{}', expected 'Classic' or 'Solver'",
                s
            ))),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for [`crate::MazeGenerator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeConfig {
    /// Requested row count; rounded up to odd by the generator.
    pub rows: usize,
    /// Requested column count; rounded up to odd by the generator.
    pub cols: usize,
    /// RNG seed. `None` derives one from the clock.
    pub seed: Option<u32>,
    /// Shortcut target is `max(1, rows / shortcut_divisor)`.
    pub shortcut_divisor: usize,
    /// Upper bound on random attempts while placing shortcuts.
    pub shortcut_attempts: usize,
    pub game_mode: GameMode,
}

impl MazeConfig {
    /// Square maze with edge length `size`.
    pub fn square(size: usize) -> Self {
        Self {
            rows: size,
            cols: size,
            seed: None,
            shortcut_divisor: DEFAULT_SHORTCUT_DIVISOR,
            shortcut_attempts: DEFAULT_SHORTCUT_ATTEMPTS,
            game_mode: GameMode::default(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_game_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = mode;
        self
    }

    pub fn with_shortcut_divisor(mut self, divisor: usize) -> Self {
        self.shortcut_divisor = divisor;
        self
    }

    pub fn with_shortcut_attempts(mut self, attempts: usize) -> Self {
        self.shortcut_attempts = attempts;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("rows", self.rows), ("cols", self.cols)] {
            if !(MIN_MAZE_SIZE..=MAX_MAZE_SIZE).contains(&value) {
                return Err(MazeError::ConfigurationInvalid(format!(
                    "{} must be between {} and {}, got {}",
                    name, MIN_MAZE_SIZE, MAX_MAZE_SIZE, value
                )));
            }
        }
        if self.shortcut_divisor == 0 {
            return Err(MazeError::ConfigurationInvalid(
                "shortcut divisor must be non-zero".to_string(),
            ));
        }
        if self.shortcut_attempts == 0 {
            return Err(MazeError::ConfigurationInvalid(
                "shortcut attempts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Neighbour expansion order used by [`crate::MazeSolver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchOrder {
    /// Up, left, down, right. Enumerates every simple path.
    #[default]
    Fixed,
    /// Nearest-to-goal first (Manhattan distance), abandoning partial paths
    /// that are already as long as the best complete path. Finds the shortest
    /// path quickly but does not enumerate every path.
    GoalDirected,
}

/// Search budget and strategy for [`crate::MazeSolver`]. All limits default to unbounded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub order: SearchOrder,
    /// Stop after this many distinct paths have been recorded.
    pub max_paths: Option<usize>,
    /// Never extend a partial path beyond this many cells.
    pub max_depth: Option<usize>,
    /// Stop after this many cell expansions.
    pub max_expansions: Option<usize>,
}

impl SolverConfig {
    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = Some(max_paths);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size_range() {
        assert!(MazeConfig::square(3).validate().is_ok());
        assert!(MazeConfig::square(50).validate().is_ok());
        assert!(matches!(
            MazeConfig::square(2).validate(),
            Err(MazeError::ConfigurationInvalid(_))
        ));
        assert!(MazeConfig::square(51).validate().is_err());
    }

    #[test]
    fn test_validate_heuristics() {
        assert!(MazeConfig::square(9)
            .with_shortcut_divisor(0)
            .validate()
            .is_err());
        assert!(MazeConfig::square(9)
            .with_shortcut_attempts(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_game_mode_parse() {
        assert_eq!("Solver".parse::<GameMode>().unwrap(), GameMode::Solver);
        assert_eq!("classic".parse::<GameMode>().unwrap(), GameMode::Classic);
        assert!("Arcade".parse::<GameMode>().is_err());
        assert_eq!(GameMode::Solver.to_string(), "Solver");
    }

    #[test]
    fn test_solver_defaults_unbounded() {
        let config = SolverConfig::default();
        assert_eq!(config.order, SearchOrder::Fixed);
        assert!(config.max_paths.is_none());
        assert!(config.max_depth.is_none());
        assert!(config.max_expansions.is_none());
    }
}
