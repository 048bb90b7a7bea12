//! Keep line peaks that have near-parallel neighbors, drop isolated ones.
//!
//! Peaks are read as `(theta index, rho index)`, i.e. `(col, row)`. Two peaks
//! are neighbors when both index differences fall inside an inclusive,
//! axis-aligned box. Because the box test is symmetric the kept set does not
//! depend on the input order.

use hough_core::Peak;
use serde::{Deserialize, Serialize};

/// Neighborhood half-widths in accumulator bins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFilterParams {
    pub theta_hood: usize,
    pub rho_hood: usize,
}

impl Default for LineFilterParams {
    fn default() -> Self {
        Self {
            theta_hood: 3,
            rho_hood: 50,
        }
    }
}

#[inline]
fn within(a: usize, b: usize, hood: usize) -> bool {
    a.abs_diff(b) <= hood
}

/// Return the peaks that belong to a group of two or more, in input order.
///
/// Every member of a group is kept, not a single representative.
pub fn filter_lines(peaks: &[Peak], params: &LineFilterParams) -> Vec<Peak> {
    let mut included = vec![false; peaks.len()];

    for (i, p) in peaks.iter().enumerate() {
        if included[i] {
            continue;
        }
        let nearby: Vec<usize> = peaks
            .iter()
            .enumerate()
            .filter(|(_, q)| {
                within(p.col, q.col, params.theta_hood) && within(p.row, q.row, params.rho_hood)
            })
            .map(|(j, _)| j)
            .collect();
        if nearby.len() == 1 {
            continue;
        }
        for j in nearby {
            included[j] = true;
        }
    }

    peaks
        .iter()
        .zip(included)
        .filter_map(|(p, keep)| keep.then_some(*p))
        .collect()
}
