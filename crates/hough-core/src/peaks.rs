//! Peak extraction with neighborhood non-maximum suppression.
//!
//! The finder repeatedly takes the global maximum of a private copy of the
//! accumulator and zeroes a rectangular window around it, so one strong
//! line or circle cannot produce a cloud of near-duplicate peaks.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::accumulator::Accumulator;
use crate::error::{HoughError, Result};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A local maximum of an accumulator.
///
/// `col` is the axis-2 index (theta bin for lines, center `x` for circles),
/// `row` is the axis-1 index (rho bin for lines, center `y` for circles).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peak {
    pub col: usize,
    pub row: usize,
    /// Vote count of the cell when it was extracted.
    pub votes: u32,
}

impl Peak {
    pub fn new(col: usize, row: usize, votes: u32) -> Self {
        Self { col, row, votes }
    }
}

/// Minimum vote count a peak must reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// Absolute number of votes.
    Absolute(u32),
    /// Fraction of the accumulator's global maximum.
    RelativeToMax(f32),
}

impl Default for Threshold {
    fn default() -> Self {
        Self::RelativeToMax(0.5)
    }
}

impl Threshold {
    fn validate(&self) -> Result<()> {
        match *self {
            Threshold::Absolute(_) => Ok(()),
            Threshold::RelativeToMax(f) if f.is_finite() && f >= 0.0 => Ok(()),
            Threshold::RelativeToMax(f) => Err(HoughError::config(format!(
                "relative threshold must be finite and non-negative, got {f}"
            ))),
        }
    }

    /// Threshold in votes for an accumulator whose maximum is `max_value`.
    pub fn resolve(&self, max_value: u32) -> f64 {
        match *self {
            Threshold::Absolute(v) => v as f64,
            Threshold::RelativeToMax(f) => f as f64 * max_value as f64,
        }
    }
}

/// Extent of the suppression window in accumulator cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub rows: usize,
    pub cols: usize,
}

impl Neighborhood {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// About 2% of each accumulator dimension: `dim / 50 + 1`.
    pub fn for_shape(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows / 50 + 1,
            cols: cols / 50 + 1,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(HoughError::config(format!(
                "suppression neighborhood must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

/// Parameters for [`find_peaks`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakParams {
    /// Maximum number of peaks to extract.
    pub num_peaks: usize,
    pub threshold: Threshold,
    /// Suppression window; `None` derives it from the accumulator shape.
    pub neighborhood: Option<Neighborhood>,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            num_peaks: 10,
            threshold: Threshold::default(),
            neighborhood: None,
        }
    }
}

impl PeakParams {
    pub fn validate(&self) -> Result<()> {
        self.threshold.validate()?;
        if let Some(hood) = &self.neighborhood {
            hood.validate()?;
        }
        Ok(())
    }
}

/// Extract up to `params.num_peaks` peaks from `acc`, strongest first.
///
/// The input is never modified. Each extracted peak zeroes the window
/// `[row - rows/2, row + rows/2] x [col - cols/2, col + cols/2]` (clipped) in
/// the working copy; the window always covers the peak itself. Extraction
/// stops as soon as the remaining maximum is below the threshold or zero.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(acc, params), fields(rows = acc.rows(), cols = acc.cols()))
)]
pub fn find_peaks(acc: &Accumulator, params: &PeakParams) -> Result<Vec<Peak>> {
    params.validate()?;

    let (rows, cols) = acc.shape();
    let hood = params
        .neighborhood
        .unwrap_or_else(|| Neighborhood::for_shape(rows, cols));
    let half_rows = hood.rows / 2;
    let half_cols = hood.cols / 2;

    let threshold = params.threshold.resolve(acc.max_value());
    let mut work = acc.clone();
    let mut peaks = Vec::with_capacity(params.num_peaks.min(rows * cols));

    while peaks.len() < params.num_peaks {
        let Some((row, col, votes)) = work.argmax() else {
            break;
        };
        if votes == 0 || (votes as f64) < threshold {
            break;
        }
        peaks.push(Peak { col, row, votes });
        work.clear_window(
            row.saturating_sub(half_rows),
            row + half_rows,
            col.saturating_sub(half_cols),
            col + half_cols,
        );
    }

    debug!(
        "{} peaks from {}x{} accumulator (threshold {:.1}, window {}x{})",
        peaks.len(),
        rows,
        cols,
        threshold,
        hood.rows,
        hood.cols
    );
    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, cols: usize, cells: &[(usize, usize, u32)]) -> Accumulator {
        let mut acc = Accumulator::zeros(rows, cols);
        for &(r, c, v) in cells {
            acc.set(r, c, v);
        }
        acc
    }

    #[test]
    fn default_neighborhood_scales_with_shape() {
        assert_eq!(Neighborhood::for_shape(180, 49), Neighborhood::new(4, 1));
        assert_eq!(Neighborhood::for_shape(1001, 180), Neighborhood::new(21, 4));
    }

    #[test]
    fn returns_peaks_in_descending_order() {
        let acc = grid(20, 20, &[(2, 3, 9), (15, 4, 7), (10, 17, 12)]);
        let peaks = find_peaks(&acc, &PeakParams::default()).unwrap();
        assert_eq!(
            peaks,
            vec![
                Peak::new(17, 10, 12),
                Peak::new(3, 2, 9),
                Peak::new(4, 15, 7),
            ]
        );
    }

    #[test]
    fn suppresses_neighbors_of_extracted_peak() {
        let acc = grid(10, 10, &[(5, 5, 10), (5, 6, 9), (6, 5, 9), (0, 0, 8)]);
        let params = PeakParams {
            neighborhood: Some(Neighborhood::new(3, 3)),
            ..PeakParams::default()
        };
        let peaks = find_peaks(&acc, &params).unwrap();
        assert_eq!(peaks, vec![Peak::new(5, 5, 10), Peak::new(0, 0, 8)]);
    }

    #[test]
    fn never_returns_same_coordinate_twice_with_unit_window() {
        let acc = grid(10, 10, &[(4, 4, 5)]);
        let params = PeakParams {
            threshold: Threshold::Absolute(1),
            neighborhood: Some(Neighborhood::new(1, 1)),
            ..PeakParams::default()
        };
        let peaks = find_peaks(&acc, &params).unwrap();
        assert_eq!(peaks, vec![Peak::new(4, 4, 5)]);
    }

    #[test]
    fn suppressed_coordinate_is_not_returned_on_second_pass() {
        let acc = grid(12, 12, &[(6, 6, 10), (6, 7, 9)]);
        let params = PeakParams {
            threshold: Threshold::Absolute(1),
            neighborhood: Some(Neighborhood::new(3, 3)),
            ..PeakParams::default()
        };
        let first = find_peaks(&acc, &params).unwrap();
        assert_eq!(first, vec![Peak::new(6, 6, 10)]);

        // Keep only the suppressed cell and search again: the first pass must
        // not have reported it, the second one finds it on its own.
        let rest = grid(12, 12, &[(6, 7, 9)]);
        let second = find_peaks(&rest, &params).unwrap();
        assert!(second.iter().all(|p| !first.contains(p)));
        assert_eq!(second, vec![Peak::new(7, 6, 9)]);
    }

    #[test]
    fn respects_num_peaks_and_threshold() {
        let cells: Vec<(usize, usize, u32)> =
            (0..8).map(|i| (i * 10, i * 10, 100 - i as u32 * 10)).collect();
        let acc = grid(80, 80, &cells);
        let params = PeakParams {
            num_peaks: 5,
            threshold: Threshold::RelativeToMax(0.5),
            neighborhood: None,
        };
        let peaks = find_peaks(&acc, &params).unwrap();
        assert_eq!(peaks.len(), 5);
        let threshold = params.threshold.resolve(acc.max_value());
        for p in &peaks {
            assert!(acc.get(p.row, p.col) as f64 >= threshold);
        }

        let strict = PeakParams {
            num_peaks: 10,
            threshold: Threshold::Absolute(75),
            neighborhood: None,
        };
        assert_eq!(find_peaks(&acc, &strict).unwrap().len(), 3);
    }

    #[test]
    fn zero_accumulator_yields_no_peaks_for_any_threshold() {
        let acc = Accumulator::zeros(30, 30);
        for threshold in [
            Threshold::Absolute(0),
            Threshold::RelativeToMax(0.0),
            Threshold::RelativeToMax(0.5),
        ] {
            let params = PeakParams {
                threshold,
                ..PeakParams::default()
            };
            assert!(find_peaks(&acc, &params).unwrap().is_empty());
        }
    }

    #[test]
    fn does_not_mutate_input() {
        let acc = grid(5, 5, &[(2, 2, 3)]);
        let before = acc.clone();
        find_peaks(&acc, &PeakParams::default()).unwrap();
        assert_eq!(acc, before);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let acc = Accumulator::zeros(4, 4);
        let bad_hood = PeakParams {
            neighborhood: Some(Neighborhood::new(0, 3)),
            ..PeakParams::default()
        };
        assert!(matches!(
            find_peaks(&acc, &bad_hood),
            Err(HoughError::InvalidConfig(_))
        ));
        let bad_threshold = PeakParams {
            threshold: Threshold::RelativeToMax(f32::NAN),
            ..PeakParams::default()
        };
        assert!(find_peaks(&acc, &bad_threshold).is_err());
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: PeakParams =
            serde_json::from_str(r#"{ "threshold": { "absolute": 12 } }"#).unwrap();
        assert_eq!(params.num_peaks, 10);
        assert_eq!(params.threshold, Threshold::Absolute(12));
        assert_eq!(params.neighborhood, None);
    }
}
