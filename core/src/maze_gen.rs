//! Maze generation using Recursive Backtracker algorithm
//!
//! Generation runs in four passes over a [`Grid`]:
//! 1. Carve a perfect maze over the odd-coordinate lattice starting at (1, 1).
//!    Each visited cell shuffles the four two-step directions; every direction
//!    whose destination is an interior wall carves the destination and the
//!    wall between, then continues from the destination.
//! 2. Seal the outer ring and patch the bottom-left interior corner.
//! 3. Punch a bounded number of shortcuts through walls separating exactly
//!    two corridors, turning the spanning tree into a graph with a few cycles.
//! 4. Place the goal (and, in classic mode, the start) on random path cells.
//!
//! The carve keeps an explicit stack of frames instead of recursing, so the
//! depth is bounded by heap memory rather than the call stack.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{GameMode, MazeConfig};
use crate::error::Result;
use crate::grid::{is_traversable, normalize_dimension, offset, CellKind, Direction, Grid, Position};
use crate::rng::{MazeRng, SimpleLCG};

/// Carving origin; always a path cell after generation.
pub const ORIGIN: Position = Position::new(1, 1);

// Two-step moves, in the order they are handed to the shuffle
const CARVE_DIRECTIONS: [Direction; 4] = [
    Direction::West,
    Direction::East,
    Direction::North,
    Direction::South,
];

/// A generated maze together with the decisions made while building it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    pub grid: Grid,
    /// Seed of the [`SimpleLCG`] that drove generation, when one was used.
    pub seed: Option<u32>,
    pub start: Option<Position>,
    pub goal: Option<Position>,
    /// Shortcut cells, in placement order.
    pub shortcuts: Vec<Position>,
    pub game_mode: GameMode,
}

impl Maze {
    /// Generate a square maze from a seed.
    ///
    /// # Arguments
    /// * `size` - Edge length, 3..=50; even values are rounded up
    /// * `seed` - RNG seed for deterministic generation
    pub fn generate(size: usize, seed: u32) -> Result<Self> {
        let config = MazeConfig::square(size).with_seed(seed);
        Ok(MazeGenerator::new(config)?.generate())
    }
}

struct CarveFrame {
    pos: Position,
    directions: [Direction; 4],
    next: usize,
}

/// Builds mazes according to a [`MazeConfig`], drawing randomness from `R`.
pub struct MazeGenerator<R = SimpleLCG> {
    config: MazeConfig,
    rng: R,
    seed: Option<u32>,
}

impl MazeGenerator<SimpleLCG> {
    /// Generator seeded from `config.seed`, or from the clock when unset.
    pub fn new(config: MazeConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(clock_seed);
        Ok(Self {
            config,
            rng: SimpleLCG::new(seed),
            seed: Some(seed),
        })
    }
}

impl<R: MazeRng> MazeGenerator<R> {
    /// Generator driven by a caller-supplied random source.
    pub fn with_rng(config: MazeConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            seed: None,
        })
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Runs every generation pass and returns the finished maze.
    pub fn generate(&mut self) -> Maze {
        let rows = normalize_dimension(self.config.rows);
        let cols = normalize_dimension(self.config.cols);
        let mut grid = Grid::new(rows, cols);

        self.carve(&mut grid);
        grid.seal_border();
        fix_bottom_left_corner(&mut grid);

        let shortcuts = self.add_shortcuts(&mut grid);
        let goal = self.place_random_goal(&mut grid);
        let start = match self.config.game_mode {
            GameMode::Classic => self.place_random_start(&mut grid),
            GameMode::Solver => None,
        };

        tracing::debug!(
            "Generated {}x{} maze (seed: {:?}, shortcuts: {}, start: {:?}, goal: {:?})",
            rows,
            cols,
            self.seed,
            shortcuts.len(),
            start,
            goal
        );

        Maze {
            grid,
            seed: self.seed,
            start,
            goal,
            shortcuts,
            game_mode: self.config.game_mode,
        }
    }

    /// Carves a perfect maze into `grid` starting from [`ORIGIN`].
    pub fn carve(&mut self, grid: &mut Grid) {
        grid.put(ORIGIN, CellKind::Path);
        let mut stack = vec![self.frame(ORIGIN)];

        while let Some(top) = stack.last_mut() {
            if top.next == top.directions.len() {
                stack.pop();
                continue;
            }

            let dir = top.directions[top.next];
            top.next += 1;
            let pos = top.pos;

            let Some(dest) = offset(pos, dir, 2) else {
                continue;
            };
            if !grid.is_interior(dest) || grid.kind_at(dest) != Some(CellKind::Wall) {
                continue;
            }
            let Some(between) = offset(pos, dir, 1) else {
                continue;
            };

            grid.put(dest, CellKind::Path);
            grid.put(between, CellKind::Path);
            let frame = self.frame(dest);
            stack.push(frame);
        }
    }

    fn frame(&mut self, pos: Position) -> CarveFrame {
        let mut directions = CARVE_DIRECTIONS;
        self.rng.shuffle(&mut directions);
        CarveFrame {
            pos,
            directions,
            next: 0,
        }
    }

    /// Converts random interior walls into shortcuts.
    ///
    /// Stops at `max(1, rows / shortcut_divisor)` shortcuts or after
    /// `shortcut_attempts` tries, whichever comes first. Returns the
    /// placed cells; fewer than the target is a normal outcome.
    pub fn add_shortcuts(&mut self, grid: &mut Grid) -> Vec<Position> {
        let target = shortcut_target(grid.rows(), self.config.shortcut_divisor);
        let mut placed = Vec::with_capacity(target);
        let mut attempts = 0;

        while placed.len() < target && attempts < self.config.shortcut_attempts {
            attempts += 1;
            let pos = Position::new(
                self.rng.randint(1, grid.rows() - 2),
                self.rng.randint(1, grid.cols() - 2),
            );

            if grid.kind_at(pos) == Some(CellKind::Wall) && is_valid_shortcut(grid, pos) {
                grid.put(pos, CellKind::Shortcut);
                placed.push(pos);
            }
        }

        if placed.len() < target {
            tracing::warn!(
                "Placed {} of {} shortcuts after {} attempts",
                placed.len(),
                target,
                attempts
            );
        }
        placed
    }

    /// Turns a uniformly chosen interior path cell into the goal.
    ///
    /// Returns `None` (and leaves the grid untouched) when no path cell exists.
    pub fn place_random_goal(&mut self, grid: &mut Grid) -> Option<Position> {
        self.place_on_random_path(grid, CellKind::Goal)
    }

    /// Turns a uniformly chosen interior path cell into the start.
    pub fn place_random_start(&mut self, grid: &mut Grid) -> Option<Position> {
        self.place_on_random_path(grid, CellKind::Start)
    }

    fn place_on_random_path(&mut self, grid: &mut Grid, kind: CellKind) -> Option<Position> {
        let candidates = grid.interior_cells(CellKind::Path);
        if candidates.is_empty() {
            tracing::debug!("No path cell available for {:?}", kind);
            return None;
        }
        let pos = candidates[self.rng.choice_index(candidates.len())];
        grid.put(pos, kind);
        Some(pos)
    }
}

/// Number of shortcuts the generator aims for on a grid with `rows` rows.
pub fn shortcut_target(rows: usize, divisor: usize) -> usize {
    (rows / divisor.max(1)).max(1)
}

/// Whether the wall at `pos` joins exactly two corridors along one axis.
///
/// Qualifies when both horizontal neighbours are walkable and both vertical
/// neighbours are walls, or the same with the axes swapped.
pub fn is_valid_shortcut(grid: &Grid, pos: Position) -> bool {
    if !grid.is_interior(pos) || grid.kind_at(pos) != Some(CellKind::Wall) {
        return false;
    }

    let kind = |dir| offset(pos, dir, 1).and_then(|p| grid.kind_at(p));
    let walkable = |dir| kind(dir).is_some_and(is_traversable);
    let wall = |dir| kind(dir) == Some(CellKind::Wall);

    let horizontal = walkable(Direction::West)
        && walkable(Direction::East)
        && wall(Direction::North)
        && wall(Direction::South);
    let vertical = walkable(Direction::North)
        && walkable(Direction::South)
        && wall(Direction::West)
        && wall(Direction::East);

    horizontal || vertical
}

/// Opens the bottom-left interior corner if the carve left it walled in
/// next to a path cell. Returns whether anything changed.
pub fn fix_bottom_left_corner(grid: &mut Grid) -> bool {
    let corner = Position::new(grid.rows() - 2, 1);
    if grid.kind_at(corner) != Some(CellKind::Wall) {
        return false;
    }

    let touches_path = grid
        .neighbors(corner)
        .any(|p| grid.kind_at(p) == Some(CellKind::Path));
    if !touches_path {
        return false;
    }

    grid.put(corner, CellKind::Path);
    let right = Position::new(corner.row, corner.col + 1);
    if grid.is_interior(right) {
        grid.put(right, CellKind::Path);
    }
    tracing::debug!("Opened bottom-left corner at {}", corner);
    true
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Keeps every shuffle in its original order and always picks the last
    /// candidate (or the low end of a range).
    struct Scripted;

    impl MazeRng for Scripted {
        fn randint(&mut self, a: usize, _b: usize) -> usize {
            a
        }

        fn choice_index(&mut self, len: usize) -> usize {
            len - 1
        }
    }

    fn reachable_from_origin(grid: &Grid) -> Vec<Vec<bool>> {
        let mut seen = vec![vec![false; grid.cols()]; grid.rows()];
        let mut queue = VecDeque::from([ORIGIN]);
        seen[ORIGIN.row][ORIGIN.col] = true;
        while let Some(pos) = queue.pop_front() {
            for next in grid.neighbors(pos) {
                if grid.is_traversable_at(next) && !seen[next.row][next.col] {
                    seen[next.row][next.col] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    #[test]
    fn test_scripted_carve_snapshot() {
        let config = MazeConfig::square(5).with_game_mode(GameMode::Solver);
        let maze = MazeGenerator::with_rng(config, Scripted).unwrap().generate();

        assert_eq!(
            maze.grid.to_string(),
            "#####\n\
             #...#\n\
             ###.#\n\
             #..G#\n\
             #####\n"
        );
        assert_eq!(maze.goal, Some(Position::new(3, 3)));
        assert_eq!(maze.start, None);
        assert!(maze.shortcuts.is_empty());
        assert_eq!(maze.seed, None);
    }

    #[test]
    fn test_scripted_classic_places_start() {
        let maze = MazeGenerator::with_rng(MazeConfig::square(4), Scripted)
            .unwrap()
            .generate();

        assert_eq!(maze.grid.rows(), 5);
        assert_eq!(maze.start, Some(Position::new(3, 2)));
        assert_eq!(maze.grid.to_string().lines().nth(3), Some("#.SG#"));
    }

    #[test]
    fn test_maze_generation() {
        let maze = Maze::generate(11, 12345).unwrap();
        let grid = &maze.grid;

        assert_eq!(grid.rows(), 11);
        assert_eq!(grid.cols(), 11);
        assert!(grid.is_traversable_at(ORIGIN));
        assert_eq!(maze.seed, Some(12345));
        assert_eq!(grid.count(CellKind::Goal), 1);
        assert_eq!(grid.count(CellKind::Start), 1);
    }

    #[test]
    fn test_determinism() {
        let maze1 = Maze::generate(21, 99999).unwrap();
        let maze2 = Maze::generate(21, 99999).unwrap();
        assert_eq!(maze1, maze2);
    }

    #[test]
    fn test_different_seeds() {
        let maze1 = Maze::generate(21, 11111).unwrap();
        let maze2 = Maze::generate(21, 22222).unwrap();
        assert_ne!(maze1.grid, maze2.grid);
    }

    #[test]
    fn test_invalid_size_rejected() {
        assert!(Maze::generate(2, 1).is_err());
        assert!(Maze::generate(51, 1).is_err());
    }

    #[test]
    fn test_carve_is_spanning_tree() {
        for seed in [1, 7, 42, 2918957128] {
            let mut generator = MazeGenerator::new(MazeConfig::square(15).with_seed(seed)).unwrap();
            let mut grid = Grid::new(15, 15);
            generator.carve(&mut grid);

            // A tree over n lattice cells has n - 1 corridor cells between them
            let lattice = 7 * 7;
            assert_eq!(grid.count(CellKind::Path), 2 * lattice - 1);
            for row in (1..15).step_by(2) {
                for col in (1..15).step_by(2) {
                    assert_eq!(grid.kind_at(Position::new(row, col)), Some(CellKind::Path));
                }
            }
        }
    }

    #[test]
    fn test_border_and_connectivity() {
        for size in 3..=25 {
            for seed in [3, 1234, 987654] {
                let maze = Maze::generate(size, seed).unwrap();
                let grid = &maze.grid;

                for pos in grid.positions().filter(|p| grid.is_border(*p)) {
                    assert_eq!(grid.kind_at(pos), Some(CellKind::Wall), "border at {}", pos);
                }

                let seen = reachable_from_origin(grid);
                for pos in grid.positions().filter(|p| grid.is_traversable_at(*p)) {
                    assert!(seen[pos.row][pos.col], "{} unreachable (size {}, seed {})", pos, size, seed);
                }
            }
        }
    }

    #[test]
    fn test_shortcut_bounds() {
        for seed in 1..30 {
            let maze = Maze::generate(21, seed).unwrap();
            let target = shortcut_target(maze.grid.rows(), 3);
            assert_eq!(target, 7);
            assert!(maze.shortcuts.len() <= target);
            assert_eq!(maze.grid.count(CellKind::Shortcut), maze.shortcuts.len());

            for &pos in &maze.shortcuts {
                let walk = |r: usize, c: usize| maze.grid.is_traversable_at(Position::new(r, c));
                let horizontal = walk(pos.row, pos.col - 1) && walk(pos.row, pos.col + 1);
                let vertical = walk(pos.row - 1, pos.col) && walk(pos.row + 1, pos.col);
                assert!(horizontal || vertical, "shortcut {} joins nothing", pos);
            }
        }
    }

    #[test]
    fn test_each_shortcut_valid_when_placed() {
        for seed in 1..30 {
            let mut generator = MazeGenerator::new(MazeConfig::square(21).with_seed(seed)).unwrap();
            let mut grid = Grid::new(21, 21);
            generator.carve(&mut grid);
            grid.seal_border();
            fix_bottom_left_corner(&mut grid);

            let mut replay = grid.clone();
            let placed = generator.add_shortcuts(&mut grid);

            // replay placements in order against the grid as it was at each step
            for &pos in &placed {
                assert_eq!(replay.kind_at(pos), Some(CellKind::Wall), "seed {}: {}", seed, pos);
                assert!(
                    is_valid_shortcut(&replay, pos),
                    "seed {}: shortcut {} invalid when placed",
                    seed,
                    pos
                );
                replay.set(pos, CellKind::Shortcut).unwrap();
            }
            assert_eq!(replay, grid);
        }
    }

    #[test]
    fn test_shortcut_predicate() {
        let rows = [
            vec![0u8, 0, 0, 0, 0],
            vec![0, 1, 0, 1, 0],
            vec![0, 0, 0, 1, 0],
            vec![0, 1, 1, 1, 0],
            vec![0, 0, 0, 0, 0],
        ];
        let grid = Grid::from_rows(&rows).unwrap();

        assert!(is_valid_shortcut(&grid, Position::new(2, 1)));
        assert!(is_valid_shortcut(&grid, Position::new(1, 2)));
        // path cells and border cells never qualify
        assert!(!is_valid_shortcut(&grid, Position::new(1, 1)));
        assert!(!is_valid_shortcut(&grid, Position::new(0, 1)));
        // (2, 2) would join corridors around a corner
        assert!(!is_valid_shortcut(&grid, Position::new(2, 2)));
    }

    #[test]
    fn test_fix_bottom_left_corner() {
        let rows = [
            vec![0u8, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 0],
            vec![0, 1, 0, 0, 0],
            vec![0, 0, 0, 1, 0],
            vec![0, 0, 0, 0, 0],
        ];
        let mut grid = Grid::from_rows(&rows).unwrap();
        assert!(fix_bottom_left_corner(&mut grid));
        assert_eq!(grid.kind_at(Position::new(3, 1)), Some(CellKind::Path));
        assert_eq!(grid.kind_at(Position::new(3, 2)), Some(CellKind::Path));

        // already open: untouched
        assert!(!fix_bottom_left_corner(&mut grid));
    }

    #[test]
    fn test_goal_without_path_cells() {
        let mut generator = MazeGenerator::with_rng(MazeConfig::square(5), Scripted).unwrap();
        let mut grid = Grid::new(5, 5);
        assert_eq!(generator.place_random_goal(&mut grid), None);
        assert_eq!(grid.count(CellKind::Goal), 0);
    }

    #[test]
    fn test_smallest_maze() {
        let maze = Maze::generate(3, 5).unwrap();
        assert_eq!(maze.goal, Some(ORIGIN));
        assert_eq!(maze.start, None);
        assert!(maze.shortcuts.is_empty());
    }
}
