//! Exhaustive enumeration of simple paths between start and goal.
//!
//! The search is a backtracking DFS over a private copy of the grid. Every
//! time the goal is reached the current path is recorded, unless a path over
//! the same set of cells was already recorded. Results are ordered by length,
//! ties kept in discovery order, so the first entry is also the shortest path
//! found first.
//!
//! A generated maze is a spanning tree plus a handful of shortcuts, so the
//! number of simple paths stays small. Grids with many cycles can still
//! explode; [`SolverConfig`] carries opt-in limits for those.

use std::collections::HashSet;

use crate::config::{SearchOrder, SolverConfig};
use crate::error::{MazeError, Result};
use crate::grid::{CellKind, Direction, Grid, Position};

/// Lifecycle of a [`MazeSolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverState {
    Uninitialized,
    Located { start: Position, goal: Position },
    Searching,
    Done,
}

/// How a solve finished. None of these are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// At least one path was found and the search ran to completion.
    Solved,
    /// Start and goal exist but are not connected.
    Unsolvable,
    /// The grid has no start or no goal marker.
    MissingMarker,
    /// A search limit stopped the enumeration early; `paths` may be incomplete.
    Truncated,
}

/// One simple path from start to goal, both inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SolvedPath {
    cells: Vec<Position>,
}

impl SolvedPath {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of cells, endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// The path as a sequence of moves.
    pub fn moves(&self) -> Vec<Direction> {
        moves_for_path(&self.cells)
    }
}

/// Moves between consecutive cells. Stops at the first non-adjacent pair.
pub fn moves_for_path(cells: &[Position]) -> Vec<Direction> {
    cells
        .windows(2)
        .map_while(|pair| Direction::between(pair[0], pair[1]))
        .collect()
}

/// Result of [`MazeSolver::solve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub start: Option<Position>,
    pub goal: Option<Position>,
    /// Distinct paths, shortest first, ties in discovery order.
    pub paths: Vec<SolvedPath>,
    pub shortest: Option<SolvedPath>,
    /// Working grid with the shortest path marked as [`CellKind::Solution`].
    pub annotated: Grid,
    pub outcome: SolveOutcome,
    /// Cells expanded during the search.
    pub expansions: usize,
}

impl Solution {
    pub fn is_solved(&self) -> bool {
        self.shortest.is_some()
    }
}

/// Enumerates every simple path between the start and goal of a grid.
#[derive(Clone, Debug)]
pub struct MazeSolver {
    grid: Grid,
    config: SolverConfig,
    endpoints: Option<(Position, Position)>,
    state: SolverState,
}

impl MazeSolver {
    /// Solver over a copy of `grid`; endpoints are found by scanning for
    /// the `Start` and `Goal` markers.
    pub fn new(grid: &Grid, config: SolverConfig) -> Self {
        Self {
            grid: grid.clone(),
            config,
            endpoints: None,
            state: SolverState::Uninitialized,
        }
    }

    /// Solver with explicit endpoints instead of scanning for markers.
    /// `start` and `goal` may coincide but must both be walkable.
    pub fn with_endpoints(
        grid: &Grid,
        start: Position,
        goal: Position,
        config: SolverConfig,
    ) -> Result<Self> {
        for (name, pos) in [("start", start), ("goal", goal)] {
            if !grid.get(pos)?.is_traversable() {
                return Err(MazeError::ConfigurationInvalid(format!(
                    "{} {} is a wall",
                    name, pos
                )));
            }
        }
        Ok(Self {
            grid: grid.clone(),
            config,
            endpoints: Some((start, goal)),
            state: SolverState::Located { start, goal },
        })
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Finds the start and goal, moving to `Located`, or to `Done` when
    /// either marker is missing.
    pub fn locate(&mut self) -> Option<(Position, Position)> {
        if self.state == SolverState::Uninitialized {
            self.endpoints = self
                .grid
                .find(CellKind::Start)
                .zip(self.grid.find(CellKind::Goal));
            self.state = match self.endpoints {
                Some((start, goal)) => SolverState::Located { start, goal },
                None => SolverState::Done,
            };
        }
        self.endpoints
    }

    /// Runs the search. Calling it again repeats the search from scratch and
    /// yields the same result.
    pub fn solve(&mut self) -> Solution {
        let Some((start, goal)) = self.locate() else {
            tracing::debug!("Start or goal marker missing, nothing to solve");
            self.state = SolverState::Done;
            return Solution {
                start: self.grid.find(CellKind::Start),
                goal: self.grid.find(CellKind::Goal),
                paths: Vec::new(),
                shortest: None,
                annotated: self.grid.clone(),
                outcome: SolveOutcome::MissingMarker,
                expansions: 0,
            };
        };

        self.state = SolverState::Searching;
        let mut search = Search::new(&self.grid, goal, &self.config);
        search.run(start);
        self.state = SolverState::Done;

        let Search {
            mut paths,
            shortest,
            expansions,
            truncated,
            depth_limited,
            ..
        } = search;

        let shortest = shortest.map(|idx| paths[idx].clone());
        // stable: equal lengths keep discovery order
        paths.sort_by_key(SolvedPath::len);

        let outcome = if truncated || depth_limited {
            SolveOutcome::Truncated
        } else if paths.is_empty() {
            SolveOutcome::Unsolvable
        } else {
            SolveOutcome::Solved
        };

        let annotated = match &shortest {
            Some(path) => annotate(&self.grid, path.cells()),
            None => self.grid.clone(),
        };

        match outcome {
            SolveOutcome::Truncated => tracing::warn!(
                "Search stopped by limit after {} expansions with {} paths",
                expansions,
                paths.len()
            ),
            _ => tracing::debug!(
                "Solve from {} to {} finished: {:?}, {} paths, shortest {:?} cells",
                start,
                goal,
                outcome,
                paths.len(),
                shortest.as_ref().map(SolvedPath::len)
            ),
        }

        Solution {
            start: Some(start),
            goal: Some(goal),
            paths,
            shortest,
            annotated,
            outcome,
            expansions,
        }
    }
}

/// Solves `grid` by its markers with the default, unbounded configuration.
pub fn solve(grid: &Grid) -> Solution {
    MazeSolver::new(grid, SolverConfig::default()).solve()
}

/// Copy of `grid` with `path` marked for display.
///
/// Earlier `Solution` marks revert to `Path`; the path's endpoints and any
/// `Start`/`Goal`/`Wall` cell are left as they are.
pub fn annotate(grid: &Grid, path: &[Position]) -> Grid {
    let mut out = grid.clone();
    out.replace_all(CellKind::Solution, CellKind::Path);

    if path.len() > 2 {
        for &pos in &path[1..path.len() - 1] {
            if matches!(out.kind_at(pos), Some(CellKind::Path) | Some(CellKind::Shortcut)) {
                out.put(pos, CellKind::Solution);
            }
        }
    }
    out
}

struct Frame {
    candidates: [Position; 4],
    len: usize,
    next: usize,
}

struct Search<'a> {
    grid: &'a Grid,
    goal: Position,
    config: &'a SolverConfig,
    visited: Vec<bool>,
    path: Vec<Position>,
    seen: HashSet<Vec<Position>>,
    paths: Vec<SolvedPath>,
    /// Index into `paths` of the shortest path so far.
    shortest: Option<usize>,
    expansions: usize,
    truncated: bool,
    /// Some extension was skipped because of `max_depth`.
    depth_limited: bool,
}

impl<'a> Search<'a> {
    fn new(grid: &'a Grid, goal: Position, config: &'a SolverConfig) -> Self {
        Self {
            grid,
            goal,
            config,
            visited: vec![false; grid.rows() * grid.cols()],
            path: Vec::new(),
            seen: HashSet::new(),
            paths: Vec::new(),
            shortest: None,
            expansions: 0,
            truncated: false,
            depth_limited: false,
        }
    }

    fn run(&mut self, start: Position) {
        self.mark(start, true);
        self.path.push(start);

        if start == self.goal {
            self.record();
            return;
        }

        let mut stack = vec![self.expand(start)];
        while !self.truncated {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            if frame.next == frame.len {
                stack.pop();
                if let Some(cell) = self.path.pop() {
                    self.mark(cell, false);
                }
                continue;
            }

            let next = frame.candidates[frame.next];
            frame.next += 1;

            if self.config.order == SearchOrder::GoalDirected && self.prunable() {
                continue;
            }
            if self.is_visited(next) {
                continue;
            }
            if self.config.max_depth.is_some_and(|max| self.path.len() >= max) {
                self.depth_limited = true;
                continue;
            }

            self.mark(next, true);
            self.path.push(next);

            if next == self.goal {
                self.record();
                self.path.pop();
                self.mark(next, false);
                continue;
            }

            if self.config.max_expansions.is_some_and(|max| self.expansions >= max) {
                self.truncated = true;
                break;
            }
            let frame = self.expand(next);
            stack.push(frame);
        }
    }

    /// Walkable, unvisited neighbours of `pos` in expansion order.
    fn expand(&mut self, pos: Position) -> Frame {
        self.expansions += 1;

        let mut candidates = [pos; 4];
        let mut len = 0;
        for neighbor in self.grid.neighbors(pos) {
            if self.grid.is_traversable_at(neighbor) && !self.is_visited(neighbor) {
                candidates[len] = neighbor;
                len += 1;
            }
        }

        if self.config.order == SearchOrder::GoalDirected {
            let goal = self.goal;
            candidates[..len].sort_by_key(|p| (p.manhattan(goal), p.row, p.col));
        }

        Frame {
            candidates,
            len,
            next: 0,
        }
    }

    /// The current partial path is already as long as the best complete one.
    fn prunable(&self) -> bool {
        self.shortest
            .is_some_and(|idx| self.path.len() >= self.paths[idx].len())
    }

    fn record(&mut self) {
        if self.limit_reached() {
            self.truncated = true;
            return;
        }

        let mut key = self.path.clone();
        key.sort_unstable();
        if !self.seen.insert(key) {
            return;
        }

        let len = self.path.len();
        self.paths.push(SolvedPath {
            cells: self.path.clone(),
        });
        if self.shortest.map_or(true, |idx| len < self.paths[idx].len()) {
            self.shortest = Some(self.paths.len() - 1);
        }

        if self.limit_reached() {
            self.truncated = true;
        }
    }

    fn limit_reached(&self) -> bool {
        self.config
            .max_paths
            .is_some_and(|max| self.paths.len() >= max)
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.grid.cols() + pos.col
    }

    fn is_visited(&self, pos: Position) -> bool {
        self.visited[self.index(pos)]
    }

    fn mark(&mut self, pos: Position, visited: bool) {
        let idx = self.index(pos);
        self.visited[idx] = visited;
    }
}
