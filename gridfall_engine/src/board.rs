/*!
This module provides the playing grid: collision testing, piece stamping and
unstamping, full-row detection and row removal with gravity shift.
*/

use crate::{Cell, Piece};

/// The fixed-size grid of [`Cell`]s representing locked-in game state.
///
/// Coordinates are `(row, col)` with row `0` at the top; every cell is
/// reachable with `0 <= row < height`, `0 <= col < width`. Dimensions are
/// immutable for the board's lifetime and [`Board::reset`] clears all cells
/// without reallocation.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board of the given dimensions, each clamped to at
    /// least one cell.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// The board width in cells.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The board height in cells.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.width + col]
    }

    /// Iterates over the board's rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Sets every cell to unoccupied. Infallible.
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    /// Whether every filled cell of the piece maps inside the board onto an
    /// unoccupied board cell. Pure query; no mutation.
    pub fn is_valid(&self, piece: &Piece) -> bool {
        piece.cells().all(|(row, col)| {
            0 <= row
                && row < self.height as isize
                && 0 <= col
                && col < self.width as isize
                && self.cell(row as usize, col as usize).is_none()
        })
    }

    /// Stamps every filled cell of the piece onto the board with the piece's
    /// color tag.
    ///
    /// Performs no validation - the caller must have confirmed
    /// [`Board::is_valid`] beforehand. Stamping out of range or onto an
    /// occupied cell desyncs occupancy bookkeeping irrecoverably, so it fails
    /// loudly in debug builds.
    pub fn insert_piece(&mut self, piece: &Piece) {
        let color = piece.color_tag();
        for (row, col) in piece.cells() {
            debug_assert!(
                0 <= row && row < self.height as isize && 0 <= col && col < self.width as isize,
                "piece cell ({row}, {col}) stamped out of range"
            );
            let idx = row as usize * self.width + col as usize;
            debug_assert!(self.cells[idx].is_none(), "cell ({row}, {col}) stamped twice");
            self.cells[idx] = Some(color);
        }
    }

    /// Inverse of [`Board::insert_piece`]; resets the piece's cells to
    /// unoccupied. Used to lift a piece before recomputing its next position,
    /// so it cannot collide with its own previous stamp.
    pub fn clear_piece(&mut self, piece: &Piece) {
        for (row, col) in piece.cells() {
            debug_assert!(
                0 <= row && row < self.height as isize && 0 <= col && col < self.width as isize,
                "piece cell ({row}, {col}) unstamped out of range"
            );
            let idx = row as usize * self.width + col as usize;
            debug_assert!(self.cells[idx].is_some(), "cell ({row}, {col}) unstamped twice");
            self.cells[idx] = None;
        }
    }

    /// Whether every cell in the given row is occupied.
    pub fn is_line_full(&self, row: usize) -> bool {
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Removes the given row and shifts every row above it down by one.
    ///
    /// This is a top-down shift, not array splicing: for `r` from `row` down
    /// to `1`, row `r - 1` is copied into row `r`, then row `0` is reset.
    /// Rows below `row` are untouched.
    pub fn clear_line(&mut self, row: usize) {
        for r in (1..=row).rev() {
            let (above, below) = self.cells.split_at_mut(r * self.width);
            below[..self.width].copy_from_slice(&above[(r - 1) * self.width..]);
        }
        self.cells[..self.width].fill(None);
    }

    /// Scans rows bottom to top, clearing every full row, and returns how many
    /// were cleared (no hard cap).
    ///
    /// After a clear the scan re-examines the *same* row index before
    /// continuing upward: the shift just moved the row formerly above into it,
    /// and that row may itself be full. A single forward pass would
    /// under-count simultaneously full rows.
    pub fn clear_full_lines(&mut self) -> u32 {
        let mut lines = 0;
        let mut row = self.height;
        while row > 0 {
            if self.is_line_full(row - 1) {
                self.clear_line(row - 1);
                lines += 1;
            } else {
                row -= 1;
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorTag, Shape};

    fn fill_row(board: &mut Board, row: usize, skip_col: Option<usize>) {
        for col in 0..board.width {
            if Some(col) != skip_col {
                board.cells[row * board.width + col] = Some(ColorTag::Red);
            }
        }
    }

    fn occupancy(board: &Board) -> Vec<bool> {
        board.cells.iter().map(|cell| cell.is_some()).collect()
    }

    #[test]
    fn empty_board_accepts_piece_anywhere_inside() {
        let board = Board::new(10, 20);
        for shape in Shape::PLAYABLE {
            let piece = Piece::spawn(shape, board.width());
            assert!(board.is_valid(&piece), "{shape:?}");
        }
    }

    #[test]
    fn piece_outside_bounds_is_invalid() {
        let board = Board::new(10, 20);
        // Left, right, bottom, top.
        assert!(!board.is_valid(&Piece::new_at(Shape::O, -1, 0)));
        assert!(!board.is_valid(&Piece::new_at(Shape::O, 9, 0)));
        assert!(!board.is_valid(&Piece::new_at(Shape::O, 0, 19)));
        assert!(!board.is_valid(&Piece::new_at(Shape::O, 0, -1)));
        // An I-piece's empty first matrix row may hang off the top edge.
        assert!(board.is_valid(&Piece::new_at(Shape::I, 0, -1)));
    }

    #[test]
    fn piece_overlapping_occupied_cell_is_invalid() {
        let mut board = Board::new(10, 20);
        let locked = Piece::new_at(Shape::O, 4, 10);
        board.insert_piece(&locked);

        assert!(!board.is_valid(&Piece::new_at(Shape::O, 4, 10)));
        assert!(!board.is_valid(&Piece::new_at(Shape::O, 3, 9)));
        // Adjacent but not overlapping.
        assert!(board.is_valid(&Piece::new_at(Shape::O, 2, 10)));
        assert!(board.is_valid(&Piece::new_at(Shape::O, 6, 10)));
    }

    #[test]
    fn insert_then_clear_restores_prior_state() {
        let mut board = Board::new(10, 20);
        board.insert_piece(&Piece::new_at(Shape::L, 0, 17));
        board.insert_piece(&Piece::new_at(Shape::S, 6, 17));
        let before = board.clone();

        let piece = Piece::new_at(Shape::T, 3, 10);
        board.insert_piece(&piece);
        assert_ne!(board, before);
        board.clear_piece(&piece);
        assert_eq!(board, before);
    }

    #[test]
    fn insert_stamps_color_tag() {
        let mut board = Board::new(10, 20);
        board.insert_piece(&Piece::new_at(Shape::O, 0, 0));
        assert_eq!(board.cell(0, 0), Some(ColorTag::Yellow));
        assert_eq!(board.cell(1, 1), Some(ColorTag::Yellow));
        assert_eq!(board.cell(0, 2), None);
    }

    #[test]
    fn line_full_detection() {
        let mut board = Board::new(10, 20);
        assert!(!board.is_line_full(19));
        fill_row(&mut board, 19, Some(3));
        assert!(!board.is_line_full(19));
        fill_row(&mut board, 19, None);
        assert!(board.is_line_full(19));
    }

    #[test]
    fn clear_line_shifts_rows_above_and_leaves_rows_below() {
        let mut board = Board::new(10, 20);
        fill_row(&mut board, 10, Some(2));
        fill_row(&mut board, 11, None);
        fill_row(&mut board, 12, Some(7));
        let row_10 = occupancy(&board)[10 * 10..11 * 10].to_vec();
        let row_12 = occupancy(&board)[12 * 10..13 * 10].to_vec();

        board.clear_line(11);

        let after = occupancy(&board);
        // Former row 10 now occupies row 11; row 0 is empty; row 12 untouched.
        assert_eq!(after[11 * 10..12 * 10], row_10);
        assert!(after[..10].iter().all(|&occupied| !occupied));
        assert_eq!(after[12 * 10..13 * 10], row_12);
    }

    #[test]
    fn single_full_bottom_row_clears_and_shifts() {
        let mut board = Board::new(10, 20);
        fill_row(&mut board, 19, None);
        fill_row(&mut board, 18, Some(4));

        assert_eq!(board.clear_full_lines(), 1);
        // Row 19 now equals former row 18, gap included.
        assert!(!board.is_line_full(19));
        assert!(board.cell(19, 4).is_none());
        assert!(board.cell(19, 3).is_some());
        assert!((0..10).all(|col| board.cell(0, col).is_none()));
        assert!((0..10).all(|col| board.cell(18, col).is_none()));
    }

    #[test]
    fn four_simultaneous_full_rows_all_clear() {
        let mut board = Board::new(10, 20);
        for row in 16..20 {
            fill_row(&mut board, row, None);
        }
        // Some arbitrary content above the full block.
        fill_row(&mut board, 15, Some(0));
        fill_row(&mut board, 3, Some(9));
        let row_15 = occupancy(&board)[15 * 10..16 * 10].to_vec();
        let row_3 = occupancy(&board)[3 * 10..4 * 10].to_vec();

        assert_eq!(board.clear_full_lines(), 4);

        let after = occupancy(&board);
        // Rows 0-3 empty, rows 4-19 equal the former rows 0-15.
        assert!(after[..4 * 10].iter().all(|&occupied| !occupied));
        assert_eq!(after[19 * 10..20 * 10], row_15);
        assert_eq!(after[7 * 10..8 * 10], row_3);
    }

    #[test]
    fn clear_full_lines_on_mixed_board() {
        // A full row sandwiched between partial rows.
        let mut board = Board::new(10, 20);
        fill_row(&mut board, 19, Some(0));
        fill_row(&mut board, 18, None);
        fill_row(&mut board, 17, Some(9));

        assert_eq!(board.clear_full_lines(), 1);
        // Row 19 (below the clear) untouched; former row 17 shifted into 18.
        assert!(board.cell(19, 0).is_none());
        assert!(board.cell(19, 1).is_some());
        assert!(board.cell(18, 9).is_none());
        assert!(board.cell(18, 8).is_some());
        assert!((0..10).all(|col| board.cell(17, col).is_none()));
    }

    #[test]
    fn reset_empties_board_without_resizing() {
        let mut board = Board::new(10, 20);
        board.insert_piece(&Piece::new_at(Shape::Gameover, 1, 1));
        board.reset();
        assert_eq!(board, Board::new(10, 20));
    }

    #[test]
    fn degenerate_dimensions_are_clamped() {
        let board = Board::new(0, 0);
        assert_eq!(board.width(), 1);
        assert_eq!(board.height(), 1);
    }
}
