//! Replaying a player's moves through a maze.
//!
//! A walk starts on a walkable cell and applies moves one at a time. Every
//! move must stay inside the grid and land on a walkable cell. Processing
//! stops as soon as the goal is reached; later moves are ignored.

use crate::error::{MazeError, Result};
use crate::grid::{offset, Direction, Grid, Position};
use crate::MAX_MOVES;

/// Result of replaying a move sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The goal was reached after `steps` moves.
    ReachedGoal { steps: usize },
    /// The start cell itself is a wall.
    InvalidStart,
    /// Move `index` has a code outside 0..=3.
    InvalidDirection { index: usize, code: u8 },
    /// Move `index` would leave the grid or enter a wall; `at` is where the walker stood.
    Blocked { index: usize, at: Position },
    /// All moves were valid but the walker ended at `at`, short of the goal.
    Incomplete { at: Position },
}

impl WalkOutcome {
    pub fn reached_goal(&self) -> bool {
        matches!(self, WalkOutcome::ReachedGoal { .. })
    }
}

/// A walker constrained to the walkable cells of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    position: Position,
    steps: usize,
}

impl Player {
    pub fn new(grid: &Grid, start: Position) -> Result<Self> {
        grid.check(start)?;
        Ok(Self {
            position: start,
            steps: 0,
        })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Moves one cell in `dir` if the target is walkable. Returns whether it moved.
    pub fn step(&mut self, grid: &Grid, dir: Direction) -> bool {
        match offset(self.position, dir, 1) {
            Some(next) if grid.is_traversable_at(next) => {
                self.position = next;
                self.steps += 1;
                true
            }
            _ => false,
        }
    }
}

/// Replays `moves` (codes 0=North, 1=East, 2=South, 3=West) from `start`.
pub fn verify_moves(grid: &Grid, start: Position, goal: Position, moves: &[u8]) -> Result<WalkOutcome> {
    grid.check(goal)?;
    if moves.len() > MAX_MOVES {
        return Err(MazeError::ConfigurationInvalid(format!(
            "too many moves: {} (max {})",
            moves.len(),
            MAX_MOVES
        )));
    }

    let mut player = Player::new(grid, start)?;
    if !grid.is_traversable_at(start) {
        return Ok(WalkOutcome::InvalidStart);
    }
    if start == goal {
        return Ok(WalkOutcome::ReachedGoal { steps: 0 });
    }

    for (index, &code) in moves.iter().enumerate() {
        let Some(dir) = Direction::from_code(code) else {
            return Ok(WalkOutcome::InvalidDirection { index, code });
        };
        if !player.step(grid, dir) {
            return Ok(WalkOutcome::Blocked {
                index,
                at: player.position(),
            });
        }
        if player.position() == goal {
            return Ok(WalkOutcome::ReachedGoal {
                steps: player.steps(),
            });
        }
    }

    Ok(WalkOutcome::Incomplete {
        at: player.position(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::solve;
    use crate::Maze;

    fn corridor() -> Grid {
        Grid::from_rows(&[
            vec![0u8, 0, 0, 0, 0],
            vec![0, 3, 1, 1, 0],
            vec![0, 0, 0, 2, 0],
            vec![0, 1, 1, 4, 0],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap()
    }

    const START: Position = Position::new(1, 1);
    const GOAL: Position = Position::new(3, 3);

    #[test]
    fn test_valid_walk_through_shortcut() {
        let outcome = verify_moves(&corridor(), START, GOAL, &[1, 1, 2, 2]).unwrap();
        assert_eq!(outcome, WalkOutcome::ReachedGoal { steps: 4 });
        assert!(outcome.reached_goal());
    }

    #[test]
    fn test_moves_after_goal_are_ignored() {
        let outcome = verify_moves(&corridor(), START, GOAL, &[1, 1, 2, 2, 9, 0]).unwrap();
        assert_eq!(outcome, WalkOutcome::ReachedGoal { steps: 4 });
    }

    #[test]
    fn test_blocked_by_wall() {
        let outcome = verify_moves(&corridor(), START, GOAL, &[1, 2]).unwrap();
        assert_eq!(
            outcome,
            WalkOutcome::Blocked {
                index: 1,
                at: Position::new(1, 2)
            }
        );
    }

    #[test]
    fn test_blocked_at_grid_edge() {
        let open = Grid::from_rows(&[vec![1u8, 1], vec![1, 1]]).unwrap();
        let outcome = verify_moves(&open, Position::new(0, 0), Position::new(1, 1), &[0]).unwrap();
        assert_eq!(
            outcome,
            WalkOutcome::Blocked {
                index: 0,
                at: Position::new(0, 0)
            }
        );
    }

    #[test]
    fn test_invalid_direction() {
        let outcome = verify_moves(&corridor(), START, GOAL, &[1, 4]).unwrap();
        assert_eq!(outcome, WalkOutcome::InvalidDirection { index: 1, code: 4 });
    }

    #[test]
    fn test_incomplete_and_empty() {
        assert_eq!(
            verify_moves(&corridor(), START, GOAL, &[1]).unwrap(),
            WalkOutcome::Incomplete {
                at: Position::new(1, 2)
            }
        );
        assert_eq!(
            verify_moves(&corridor(), START, GOAL, &[]).unwrap(),
            WalkOutcome::Incomplete { at: START }
        );
    }

    #[test]
    fn test_invalid_start_and_bounds() {
        assert_eq!(
            verify_moves(&corridor(), Position::new(2, 1), GOAL, &[1]).unwrap(),
            WalkOutcome::InvalidStart
        );
        assert!(verify_moves(&corridor(), Position::new(7, 1), GOAL, &[1]).is_err());
        assert!(verify_moves(&corridor(), START, GOAL, &vec![1; MAX_MOVES + 1]).is_err());
    }

    #[test]
    fn test_every_solver_path_replays() {
        let maze = Maze::generate(19, 5150).unwrap();
        let solution = solve(&maze.grid);
        let (start, goal) = (solution.start.unwrap(), solution.goal.unwrap());

        for path in &solution.paths {
            let moves: Vec<u8> = path.moves().iter().map(|d| d.code()).collect();
            assert_eq!(
                verify_moves(&maze.grid, start, goal, &moves).unwrap(),
                WalkOutcome::ReachedGoal {
                    steps: path.steps()
                }
            );
        }
    }
}
