//! Space-time grid storage and wraparound indexing.

use crate::rule::Cell;

/// `height x width` matrix of cell states, one row per time step.
///
/// Stored row-major in a single buffer. Rows past the engine's time cursor
/// are zero placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceTimeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl SpaceTimeGrid {
    /// Zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Row length.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// State at row `t`, column `column`.
    pub fn get(&self, t: usize, column: usize) -> Option<Cell> {
        if column >= self.width {
            return None;
        }
        self.cells.get(t * self.width + column).copied()
    }

    /// Row `t`, if it exists.
    pub fn row(&self, t: usize) -> Option<&[Cell]> {
        if t >= self.height {
            return None;
        }
        let start = t * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact rejects a zero chunk size
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Overwrite row 0.
    pub(crate) fn set_first_row(&mut self, row: &[Cell]) {
        debug_assert_eq!(row.len(), self.width);
        self.cells[..self.width].copy_from_slice(row);
    }

    /// Split into row `t - 1` (read) and row `t` (write).
    ///
    /// `t` must be in `1..height`.
    pub(crate) fn previous_and_current(&mut self, t: usize) -> (&[Cell], &mut [Cell]) {
        debug_assert!(t >= 1 && t < self.height);
        let start = (t - 1) * self.width;
        let (before, after) = self.cells[start..].split_at_mut(self.width);
        (&*before, &mut after[..self.width])
    }
}

/// Columns of the radius-`r` neighborhood around `column`, left to right.
///
/// Offsets wrap with true modulo, so column 0 of a width-5 row with radius 1
/// reads columns 4, 0 and 1.
pub fn wrapped_columns(column: usize, r: usize, width: usize) -> impl Iterator<Item = usize> {
    let center = column as isize;
    let r = r as isize;
    let width = width as isize;
    (center - r..=center + r).map(move |i| i.rem_euclid(width) as usize)
}
