//! Dense 2D vote grid.

use serde::{Deserialize, Serialize};

use crate::error::{HoughError, Result};

/// Row-major grid of vote counts indexed by two discretized parameters.
///
/// Lines index rows by rho bin and columns by theta bin; circles index rows
/// by center `y` and columns by center `x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulator {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl Accumulator {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<u32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(HoughError::ShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                rows: data.len() / cols.max(1),
                cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.data[row * self.cols + col] = value;
    }

    /// Add one vote to `(row, col)`.
    #[inline]
    pub fn vote(&mut self, row: usize, col: usize) {
        let cell = &mut self.data[row * self.cols + col];
        *cell = cell.saturating_add(1);
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Largest vote count, 0 for an empty grid.
    pub fn max_value(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// `(row, col, value)` of the global maximum; the first cell in row-major
    /// order wins ties.
    pub fn argmax(&self) -> Option<(usize, usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            if best.map(|(_, b)| v > b).unwrap_or(true) {
                best = Some((i, v));
            }
        }
        best.map(|(i, v)| (i / self.cols, i % self.cols, v))
    }

    pub fn total_votes(&self) -> u64 {
        self.data.iter().map(|&v| v as u64).sum()
    }

    /// Cell-wise sum with a partial accumulator of the same shape.
    pub fn merge(&mut self, other: &Accumulator) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(HoughError::ShapeMismatch {
                expected_rows: self.rows,
                expected_cols: self.cols,
                rows: other.rows,
                cols: other.cols,
            });
        }
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst = dst.saturating_add(src);
        }
        Ok(())
    }

    /// Zero the inclusive window `[row0, row1] x [col0, col1]`, clipped to the grid.
    pub fn clear_window(&mut self, row0: usize, row1: usize, col0: usize, col1: usize) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let row1 = row1.min(self.rows - 1);
        let col1 = col1.min(self.cols - 1);
        for r in row0..=row1 {
            let start = r * self.cols;
            for cell in &mut self.data[start + col0..=start + col1] {
                *cell = 0;
            }
        }
    }
}
