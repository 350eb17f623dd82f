//! The 3x3 board and win/draw detection.

use tactix_protocol::{BoardCells, Mark, Outcome};

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// The 8 winning triples: 3 rows, 3 columns, 2 diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// A 9-cell grid, row-major. A cell, once occupied, is never overwritten
/// except by [`clear`](Self::clear).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: BoardCells,
}

impl Board {
    /// Creates an all-empty board.
    pub fn new() -> Self {
        Self { cells: [None; 9] }
    }

    /// Returns the mark at `index`, if the cell is occupied.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds; callers validate against
    /// [`CELLS`] first.
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells[index]
    }

    /// Writes `mark` into the cell at `index`.
    ///
    /// Callers have already validated that the cell is empty; occupancy
    /// is re-checked here only as a debug assertion.
    pub fn place(&mut self, index: usize, mark: Mark) {
        debug_assert!(self.cells[index].is_none(), "cell {index} already occupied");
        self.cells[index] = Some(mark);
    }

    /// Returns `true` if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Scans the 8 winning triples and returns the winning mark, if any.
    ///
    /// The first matching triple in enumeration order wins. No tie-break
    /// is needed: cells hold at most one mark, so two simultaneous lines
    /// can only belong to the same mark.
    pub fn winning_mark(&self) -> Option<Mark> {
        for [a, b, c] in LINES {
            if let Some(mark) = self.cells[a] {
                if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// Evaluates the board for a terminal result: a win if any triple
    /// matches, a draw if the board is full with no winner, otherwise
    /// `None` (the game continues).
    pub fn verdict(&self) -> Option<Outcome> {
        if let Some(mark) = self.winning_mark() {
            Some(Outcome::Won { mark })
        } else if self.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Returns the raw cells for a wire payload.
    pub fn cells(&self) -> BoardCells {
        self.cells
    }

    /// Resets every cell to empty.
    pub fn clear(&mut self) {
        self.cells = [None; 9];
    }
}
