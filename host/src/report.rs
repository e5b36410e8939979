//! Serializable summaries of solver and walk results.

use maze_core::{Position, SolveOutcome, SolvedPath, Solution, WalkOutcome};
use serde::{Deserialize, Serialize};

/// How a solve finished, as written to reports
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    /// Every path was enumerated
    Solved,
    /// Start and goal are not connected
    Unsolvable,
    /// No start or no goal to solve between
    Missing,
    /// A search limit cut the enumeration short
    Truncated,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Solved => write!(f, "solved"),
            OutcomeKind::Unsolvable => write!(f, "unsolvable"),
            OutcomeKind::Missing => write!(f, "missing"),
            OutcomeKind::Truncated => write!(f, "truncated"),
        }
    }
}

impl From<SolveOutcome> for OutcomeKind {
    fn from(outcome: SolveOutcome) -> Self {
        match outcome {
            SolveOutcome::Solved => OutcomeKind::Solved,
            SolveOutcome::Unsolvable => OutcomeKind::Unsolvable,
            SolveOutcome::MissingMarker => OutcomeKind::Missing,
            SolveOutcome::Truncated => OutcomeKind::Truncated,
        }
    }
}

/// One solution path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathReport {
    /// `[row, col]` cells from start to goal, both inclusive
    pub cells: Vec<[usize; 2]>,
    /// Number of cells in `cells`
    pub length: usize,
    /// Move codes that walk the path (0=North, 1=East, 2=South, 3=West)
    pub moves: Vec<u8>,
}

impl From<&SolvedPath> for PathReport {
    fn from(path: &SolvedPath) -> Self {
        Self {
            cells: path.cells().iter().map(|p| (*p).into()).collect(),
            length: path.len(),
            moves: path.moves().iter().map(|d| d.code()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolveReport {
    pub start_point: Option<[usize; 2]>,
    pub goal_point: Option<[usize; 2]>,
    pub outcome: OutcomeKind,
    /// Distinct paths, shortest first
    pub paths: Vec<PathReport>,
    /// Index into `paths` of the shortest path
    pub shortest: Option<usize>,
    /// The maze with the shortest path marked with code 5
    pub annotated_map: Vec<Vec<u8>>,
    pub truncated: bool,
    pub expansions: usize,
}

impl SolveReport {
    pub fn shortest_path(&self) -> Option<&PathReport> {
        self.shortest.and_then(|idx| self.paths.get(idx))
    }
}

impl From<&Solution> for SolveReport {
    fn from(solution: &Solution) -> Self {
        let shortest = solution
            .shortest
            .as_ref()
            .and_then(|best| solution.paths.iter().position(|p| p == best));

        Self {
            start_point: solution.start.map(Into::into),
            goal_point: solution.goal.map(Into::into),
            outcome: solution.outcome.into(),
            paths: solution.paths.iter().map(PathReport::from).collect(),
            shortest,
            annotated_map: solution.annotated.to_rows(),
            truncated: solution.outcome == SolveOutcome::Truncated,
            expansions: solution.expansions,
        }
    }
}

/// Result of replaying a moves sequence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalkReport {
    pub reached_goal: bool,
    /// Moves taken to reach the goal
    pub steps: Option<usize>,
    /// Index of the first rejected move
    pub failed_move: Option<usize>,
    /// `[row, col]` where the walk stopped, when it did not reach the goal
    pub position: Option<[usize; 2]>,
    pub message: String,
}

impl From<WalkOutcome> for WalkReport {
    fn from(outcome: WalkOutcome) -> Self {
        let at = |pos: Position| Some(<[usize; 2]>::from(pos));
        let (steps, failed_move, position, message) = match outcome {
            WalkOutcome::ReachedGoal { steps } => {
                (Some(steps), None, None, format!("Reached the goal in {} moves", steps))
            }
            WalkOutcome::InvalidStart => (None, None, None, "Start cell is a wall".to_string()),
            WalkOutcome::InvalidDirection { index, code } => (
                None,
                Some(index),
                None,
                format!("Move {} has invalid direction {}", index, code),
            ),
            WalkOutcome::Blocked { index, at: pos } => (
                None,
                Some(index),
                at(pos),
                format!("Move {} is blocked at {}", index, pos),
            ),
            WalkOutcome::Incomplete { at: pos } => (
                None,
                None,
                at(pos),
                format!("Moves ended at {} without reaching the goal", pos),
            ),
        };

        Self {
            reached_goal: outcome.reached_goal(),
            steps,
            failed_move,
            position,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::Grid;

    #[test]
    fn test_outcome_kind_serializes_lowercase() {
        let json = serde_json::to_string(&OutcomeKind::Truncated).unwrap();
        assert_eq!(json, "\"truncated\"");
        assert_eq!(OutcomeKind::from(SolveOutcome::MissingMarker).to_string(), "missing");
    }

    #[test]
    fn test_solve_report_from_solution() {
        let grid = Grid::from_rows(&[
            vec![0u8, 0, 0, 0, 0],
            vec![0, 3, 1, 1, 0],
            vec![0, 0, 0, 1, 0],
            vec![0, 1, 1, 4, 0],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap();
        let report = SolveReport::from(&maze_core::solve(&grid));

        assert_eq!(report.outcome, OutcomeKind::Solved);
        assert_eq!(report.start_point, Some([1, 1]));
        assert_eq!(report.goal_point, Some([3, 3]));
        assert_eq!(report.shortest, Some(0));

        let best = report.shortest_path().unwrap();
        assert_eq!(best.length, 5);
        assert_eq!(best.cells.len(), best.length);
        assert_eq!(best.moves, vec![1, 1, 2, 2]);
        assert_eq!(report.annotated_map[1][2], 5);
        assert!(!report.truncated);
    }

    #[test]
    fn test_walk_report_messages() {
        let blocked = WalkReport::from(WalkOutcome::Blocked {
            index: 2,
            at: Position::new(1, 3),
        });
        assert!(!blocked.reached_goal);
        assert_eq!(blocked.failed_move, Some(2));
        assert_eq!(blocked.position, Some([1, 3]));

        let done = WalkReport::from(WalkOutcome::ReachedGoal { steps: 4 });
        assert!(done.reached_goal);
        assert_eq!(done.steps, Some(4));
        assert_eq!(done.position, None);
    }
}
