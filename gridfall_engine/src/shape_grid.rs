/*!
This module provides the square 0/1 matrix type used to describe which relative
cells a piece occupies, and its pure rotation transforms.
*/

/// A square 0/1 matrix describing a piece shape.
///
/// The side length is fixed at construction; rotation permutes cells and
/// always yields a grid of matching dimensions, making the side-length
/// invariant explicit and checkable.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeGrid {
    side: usize,
    filled: Vec<bool>,
}

impl ShapeGrid {
    /// Builds a grid from row slices, where any non-zero entry is a filled cell.
    ///
    /// # Panics
    /// Panics if the rows do not form a square matrix.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let side = rows.len();
        assert!(
            rows.iter().all(|row| row.len() == side),
            "shape matrix must be square"
        );
        Self {
            side,
            filled: rows.iter().flat_map(|row| row.iter().map(|&v| v != 0)).collect(),
        }
    }

    /// The side length of the matrix.
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Whether the cell at local `(row, col)` is filled.
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.filled[row * self.side + col]
    }

    /// Iterates over the local `(row, col)` coordinates of all filled cells.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.filled
            .iter()
            .enumerate()
            .filter(|(_, &filled)| filled)
            .map(|(i, _)| (i / self.side, i % self.side))
    }

    /// The matrix rotated 90° clockwise; `new[i][j] = old[side-1-j][i]`.
    pub fn rotated_cw(&self) -> Self {
        self.permuted(|i, j| (self.side - 1 - j, i))
    }

    /// The matrix rotated 90° counter-clockwise; `new[i][j] = old[j][side-1-i]`.
    pub fn rotated_ccw(&self) -> Self {
        self.permuted(|i, j| (j, self.side - 1 - i))
    }

    fn permuted(&self, source: impl Fn(usize, usize) -> (usize, usize)) -> Self {
        let mut filled = Vec::with_capacity(self.filled.len());
        for i in 0..self.side {
            for j in 0..self.side {
                let (r, c) = source(i, j);
                filled.push(self.is_filled(r, c));
            }
        }
        Self {
            side: self.side,
            filled,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Shape;

    #[test]
    fn rotation_preserves_side_length() {
        for shape in Shape::PLAYABLE {
            let grid = shape.grid();
            assert_eq!(grid.rotated_cw().side(), grid.side());
            assert_eq!(grid.rotated_ccw().side(), grid.side());
        }
    }

    #[test]
    fn four_clockwise_rotations_are_identity() {
        for shape in Shape::PLAYABLE {
            let grid = shape.grid();
            let rotated = grid.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(rotated, grid, "{shape:?}");
        }
    }

    #[test]
    fn clockwise_then_counterclockwise_is_identity() {
        for shape in Shape::PLAYABLE {
            let grid = shape.grid();
            assert_eq!(grid.rotated_cw().rotated_ccw(), grid, "{shape:?}");
            assert_eq!(grid.rotated_ccw().rotated_cw(), grid, "{shape:?}");
        }
    }

    #[test]
    fn clockwise_rotation_of_t_matches_by_hand() {
        // ⋅█⋅      ⋅█⋅
        // ███  ~>  ⋅██
        // ⋅⋅⋅      ⋅█⋅
        let rotated = Shape::T.grid().rotated_cw();
        let filled: Vec<_> = rotated.filled_cells().collect();
        assert_eq!(filled, [(0, 1), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn shape_matrices_have_four_cells() {
        for shape in Shape::PLAYABLE {
            assert_eq!(shape.grid().filled_cells().count(), 4, "{shape:?}");
        }
    }
}
