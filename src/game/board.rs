//! The N×N board of cells.

use super::types::{Cell, Player, Tier};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Error raised by board mutations and queries.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// The coordinates are outside the board.
    #[display("({}, {}) is outside a {}x{} board", row, col, size, size)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Board size.
        size: usize,
    },

    /// A tier stone was placed on a cell that already holds a stone.
    #[display("({}, {}) is already occupied by {}", row, col, cell)]
    Occupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// The cell's current value.
        cell: Cell,
    },

    /// Rows handed to [`Board::from_rows`] do not form a square grid.
    #[display("expected a {}x{} grid", size, size)]
    NotSquare {
        /// Expected size (the number of rows).
        size: usize,
    },
}

/// Square board of [`Cell`]s in row-major order.
///
/// `Clone` is a deep copy: the grid is owned, so a snapshot never aliases the
/// board it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an all-empty board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Builds a board from rows, which must form a square grid.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return Err(BoardError::NotSquare { size });
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, BoardError> {
        if row >= self.size || col >= self.size {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }

    /// Returns the cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// True iff the cell is in bounds and empty.
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Ok(Cell::Empty))
    }

    /// Places a tier stone. The cell must be empty.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn set_tier(&mut self, row: usize, col: usize, tier: Tier) -> Result<(), BoardError> {
        let idx = self.index(row, col)?;
        let cell = self.cells[idx];
        if !cell.is_empty() {
            return Err(BoardError::Occupied { row, col, cell });
        }
        self.cells[idx] = Cell::Tier(tier);
        Ok(())
    }

    /// Paints a collapsed stone, overwriting whatever the cell held.
    pub fn set_classical(
        &mut self,
        row: usize,
        col: usize,
        player: Player,
    ) -> Result<(), BoardError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = Cell::Classical(player);
        Ok(())
    }

    /// Returns an independent copy of the board.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Replaces the whole grid with `board`.
    pub fn replace_with(&mut self, board: Board) {
        *self = board;
    }

    /// Iterates over `(row, col, cell)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx / size, idx % size, *cell))
    }

    /// Number of non-empty cells.
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Coordinates where `self` and `other` disagree.
    ///
    /// A size mismatch reports every cell of the larger board.
    pub fn diff(&self, other: &Board) -> Vec<(usize, usize)> {
        if self.size != other.size {
            let larger = if self.size > other.size { self } else { other };
            return larger.cells().map(|(row, col, _)| (row, col)).collect();
        }
        self.cells()
            .zip(other.cells.iter())
            .filter(|((_, _, mine), theirs)| mine != *theirs)
            .map(|((row, col, _), _)| (row, col))
            .collect()
    }

    /// Formats the board as text, one row per line.
    ///
    /// `.` is empty, `1`/`3`/`7`/`9` are tier stones, `B`/`W` are collapsed.
    pub fn display(&self) -> String {
        let mut result = String::with_capacity(self.size * (self.size + 1));
        for (row, col, cell) in self.cells() {
            let symbol = match cell {
                Cell::Empty => '.',
                Cell::Tier(Tier::P10) => '1',
                Cell::Tier(Tier::P30) => '3',
                Cell::Tier(Tier::P70) => '7',
                Cell::Tier(Tier::P90) => '9',
                Cell::Classical(Player::Black) => 'B',
                Cell::Classical(Player::White) => 'W',
            };
            result.push(symbol);
            if col + 1 == self.size && row + 1 < self.size {
                result.push('\n');
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(5);
        assert_eq!(board.stone_count(), 0);
        assert!(board.cells().all(|(_, _, cell)| cell == Cell::Empty));
        assert_eq!(board.cells().count(), 25);
    }

    #[test]
    fn out_of_bounds_is_reported() {
        let board = Board::new(3);
        assert_eq!(
            board.get(3, 0),
            Err(BoardError::OutOfBounds {
                row: 3,
                col: 0,
                size: 3
            })
        );
        assert!(!board.is_empty(0, 3));
    }

    #[test]
    fn set_tier_rejects_occupied_cell_without_mutation() {
        let mut board = Board::new(3);
        board.set_tier(1, 1, Tier::P90).unwrap();
        let before = board.clone();
        let err = board.set_tier(1, 1, Tier::P10).unwrap_err();
        assert!(matches!(err, BoardError::Occupied { row: 1, col: 1, .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn set_classical_overwrites_tier() {
        let mut board = Board::new(3);
        board.set_tier(0, 2, Tier::P30).unwrap();
        board.set_classical(0, 2, Player::Black).unwrap();
        assert_eq!(board.get(0, 2), Ok(Cell::Classical(Player::Black)));
    }

    #[test]
    fn from_rows_requires_square() {
        let rows = vec![vec![Cell::Empty; 2], vec![Cell::Empty; 3]];
        assert_eq!(Board::from_rows(rows), Err(BoardError::NotSquare { size: 2 }));
    }

    #[test]
    fn diff_lists_disagreeing_cells() {
        let mut a = Board::new(3);
        let mut b = Board::new(3);
        a.set_tier(0, 0, Tier::P90).unwrap();
        b.set_tier(2, 1, Tier::P10).unwrap();
        assert_eq!(a.diff(&b), vec![(0, 0), (2, 1)]);
        assert!(a.diff(&a.snapshot()).is_empty());
    }

    #[test]
    fn display_marks_each_cell_kind() {
        let mut board = Board::new(2);
        board.set_tier(0, 0, Tier::P70).unwrap();
        board.set_classical(1, 1, Player::White).unwrap();
        assert_eq!(board.display(), "7.\n.W");
    }
}
