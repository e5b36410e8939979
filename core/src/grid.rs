//! Cell-state matrix shared by the generator and the solver.
//!
//! Cells are stored row-major. Every accessor checks bounds and reports
//! [`MazeError::OutOfBounds`] instead of indexing blindly.

use core::fmt;

use crate::error::{MazeError, Result};

/// Kind of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Path,
    Shortcut,
    Start,
    Goal,
    /// Marks a displayed solution in annotated output grids only.
    Solution,
}

impl CellKind {
    /// Integer code used by the persisted matrix format.
    pub const fn code(self) -> u8 {
        match self {
            CellKind::Wall => 0,
            CellKind::Path => 1,
            CellKind::Shortcut => 2,
            CellKind::Start => 3,
            CellKind::Goal => 4,
            CellKind::Solution => 5,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(CellKind::Wall),
            1 => Ok(CellKind::Path),
            2 => Ok(CellKind::Shortcut),
            3 => Ok(CellKind::Start),
            4 => Ok(CellKind::Goal),
            5 => Ok(CellKind::Solution),
            other => Err(MazeError::InvalidCellCode(other)),
        }
    }

    pub fn is_traversable(self) -> bool {
        is_traversable(self)
    }

    fn symbol(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Path => '.',
            CellKind::Shortcut => '+',
            CellKind::Start => 'S',
            CellKind::Goal => 'G',
            CellKind::Solution => 'o',
        }
    }
}

/// The single definition of "walkable", shared by generation and solving.
pub fn is_traversable(kind: CellKind) -> bool {
    !matches!(kind, CellKind::Wall)
}

/// A `(row, col)` coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for [usize; 2] {
    fn from(pos: Position) -> Self {
        [pos.row, pos.col]
    }
}

impl From<[usize; 2]> for Position {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Axis-aligned move. Discriminants are the move codes of saved move files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// (row delta, col delta)
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// Direction of a single step from `from` to `to`, if they are 4-adjacent.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dir| offset(from, *dir, 1) == Some(to))
    }
}

/// Moves `pos` by `distance` cells in `dir`, returning `None` on underflow.
/// The caller is responsible for checking the upper bounds.
pub fn offset(pos: Position, dir: Direction, distance: usize) -> Option<Position> {
    let (dr, dc) = dir.delta();
    let row = pos.row.checked_add_signed(dr * distance as isize)?;
    let col = pos.col.checked_add_signed(dc * distance as isize)?;
    Some(Position { row, col })
}

/// Rounds a requested edge length up to the next odd value, minimum 3.
pub fn normalize_dimension(n: usize) -> usize {
    let n = n.max(3);
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// Rectangular matrix of [`CellKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates an all-wall grid; even dimensions are rounded up to odd.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = normalize_dimension(rows);
        let cols = normalize_dimension(cols);
        Self {
            rows,
            cols,
            cells: vec![CellKind::Wall; rows * cols],
        }
    }

    /// Builds a grid from the persisted integer matrix, keeping its exact shape.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if row_count == 0 || col_count == 0 {
            return Err(MazeError::ShapeMismatch {
                expected_rows: 1,
                expected_cols: 1,
                found_rows: row_count,
                found_cols: col_count,
            });
        }

        let mut cells = Vec::with_capacity(row_count * col_count);
        for row in rows {
            let row = row.as_ref();
            if row.len() != col_count {
                return Err(MazeError::ShapeMismatch {
                    expected_rows: row_count,
                    expected_cols: col_count,
                    found_rows: row_count,
                    found_cols: row.len(),
                });
            }
            for &code in row {
                cells.push(CellKind::from_code(code)?);
            }
        }

        Ok(Self {
            rows: row_count,
            cols: col_count,
            cells,
        })
    }

    /// Encodes the grid as the persisted integer matrix.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// True for cells on the outermost ring.
    pub fn is_border(&self, pos: Position) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row == self.rows - 1 || pos.col == self.cols - 1
    }

    /// True for cells strictly inside the outer wall ring.
    pub fn is_interior(&self, pos: Position) -> bool {
        self.contains(pos) && !self.is_border(pos)
    }

    pub fn check(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn get(&self, pos: Position) -> Result<CellKind> {
        self.check(pos)?;
        Ok(self.cells[self.index(pos)])
    }

    pub fn set(&mut self, pos: Position, kind: CellKind) -> Result<()> {
        self.check(pos)?;
        let idx = self.index(pos);
        self.cells[idx] = kind;
        Ok(())
    }

    /// Unchecked write for generator passes whose coordinates are derived
    /// from already-validated positions.
    pub(crate) fn put(&mut self, pos: Position, kind: CellKind) {
        debug_assert!(self.contains(pos), "put outside grid at {}", pos);
        let idx = self.index(pos);
        self.cells[idx] = kind;
    }

    /// Cell kind, or `None` when out of bounds.
    pub fn kind_at(&self, pos: Position) -> Option<CellKind> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    pub fn is_traversable_at(&self, pos: Position) -> bool {
        self.kind_at(pos).is_some_and(is_traversable)
    }

    /// In-bounds 4-neighbours, in the order up, left, down, right.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        [
            Direction::North,
            Direction::West,
            Direction::South,
            Direction::East,
        ]
        .into_iter()
        .filter_map(move |dir| offset(pos, dir, 1))
        .filter(move |p| self.contains(*p))
    }

    /// All coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Position { row, col }))
    }

    /// First cell of `kind` in row-major order.
    pub fn find(&self, kind: CellKind) -> Option<Position> {
        self.cells
            .iter()
            .position(|c| *c == kind)
            .map(|idx| self.position_of(idx))
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| **c == kind).count()
    }

    /// Interior cells of `kind`, row-major.
    pub fn interior_cells(&self, kind: CellKind) -> Vec<Position> {
        self.positions()
            .filter(|p| !self.is_border(*p) && self.cells[self.index(*p)] == kind)
            .collect()
    }

    /// Resets the outer ring to walls.
    pub fn seal_border(&mut self) {
        for row in 0..self.rows {
            for col in [0, self.cols - 1] {
                let idx = row * self.cols + col;
                self.cells[idx] = CellKind::Wall;
            }
        }
        for col in 0..self.cols {
            for row in [0, self.rows - 1] {
                let idx = row * self.cols + col;
                self.cells[idx] = CellKind::Wall;
            }
        }
    }

    /// Replaces every cell of kind `from` with `to`.
    pub fn replace_all(&mut self, from: CellKind, to: CellKind) {
        for cell in self.cells.iter_mut().filter(|c| **c == from) {
            *cell = to;
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    fn position_of(&self, idx: usize) -> Position {
        Position {
            row: idx / self.cols,
            col: idx % self.cols,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rounds_to_odd() {
        let grid = Grid::new(4, 6);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.count(CellKind::Wall), 35);

        let tiny = Grid::new(1, 2);
        assert_eq!((tiny.rows(), tiny.cols()), (3, 3));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(5, 5);
        let err = grid.get(Position::new(5, 0)).unwrap_err();
        assert_eq!(
            err,
            MazeError::OutOfBounds {
                row: 5,
                col: 0,
                rows: 5,
                cols: 5
            }
        );
        assert!(grid.set(Position::new(0, 9), CellKind::Path).is_err());
        assert!(grid.kind_at(Position::new(7, 7)).is_none());
    }

    #[test]
    fn test_traversable() {
        assert!(!is_traversable(CellKind::Wall));
        for kind in [
            CellKind::Path,
            CellKind::Shortcut,
            CellKind::Start,
            CellKind::Goal,
        ] {
            assert!(is_traversable(kind), "{:?} should be walkable", kind);
        }
    }

    #[test]
    fn test_neighbor_order() {
        let grid = Grid::new(5, 5);
        let n: Vec<_> = grid.neighbors(Position::new(2, 2)).collect();
        assert_eq!(
            n,
            vec![
                Position::new(1, 2),
                Position::new(2, 1),
                Position::new(3, 2),
                Position::new(2, 3)
            ]
        );

        let corner: Vec<_> = grid.neighbors(Position::new(0, 0)).collect();
        assert_eq!(corner, vec![Position::new(1, 0), Position::new(0, 1)]);
    }

    #[test]
    fn test_codes_roundtrip_through_rows() {
        let mut grid = Grid::new(5, 5);
        grid.set(Position::new(1, 1), CellKind::Start).unwrap();
        grid.set(Position::new(1, 2), CellKind::Shortcut).unwrap();
        grid.set(Position::new(1, 3), CellKind::Goal).unwrap();

        let rows = grid.to_rows();
        assert_eq!(rows[1], vec![0, 3, 2, 4, 0]);
        assert_eq!(Grid::from_rows(&rows).unwrap(), grid);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert_eq!(
            Grid::from_rows(&[vec![0u8, 9]]).unwrap_err(),
            MazeError::InvalidCellCode(9)
        );
        assert!(matches!(
            Grid::from_rows(&[vec![0u8, 0], vec![0]]),
            Err(MazeError::ShapeMismatch { .. })
        ));
        assert!(Grid::from_rows::<Vec<u8>>(&[]).is_err());
    }

    #[test]
    fn test_seal_border() {
        let mut grid = Grid::new(3, 5);
        for pos in grid.positions().collect::<Vec<_>>() {
            grid.set(pos, CellKind::Path).unwrap();
        }
        grid.seal_border();
        assert_eq!(grid.count(CellKind::Path), 3);
        assert_eq!(grid.to_string(), "#####\n#...#\n#####\n");
    }

    #[test]
    fn test_direction_between() {
        let a = Position::new(3, 3);
        assert_eq!(Direction::between(a, Position::new(2, 3)), Some(Direction::North));
        assert_eq!(Direction::between(a, Position::new(3, 2)), Some(Direction::West));
        assert_eq!(Direction::between(a, Position::new(4, 4)), None);
        assert_eq!(Direction::from_code(2), Some(Direction::South));
        assert_eq!(Direction::from_code(4), None);
    }
}
