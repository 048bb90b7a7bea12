//! Center voting for a fixed radius.

use hough_core::{Accumulator, EdgeMask, HoughError, Result};
use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "rayon")]
const POINTS_PER_TASK: usize = 512;

/// Angular range swept around every edge pixel, one vote per degree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleSweep {
    /// 0..179 degrees. Relies on opposite edge pixels of the same circle
    /// covering the other half.
    #[default]
    Half,
    /// 0..359 degrees.
    Full,
}

impl AngleSweep {
    pub fn degrees(&self) -> u32 {
        match self {
            AngleSweep::Half => 180,
            AngleSweep::Full => 360,
        }
    }

    /// `r * (cos, sin)` for every swept degree.
    fn offsets(&self, radius: f64) -> Vec<(f64, f64)> {
        (0..self.degrees())
            .map(|deg| {
                let (s, c) = f64::from(deg).to_radians().sin_cos();
                (radius * c, radius * s)
            })
            .collect()
    }
}

/// Vote for circle centers at distance `radius` from every edge pixel.
///
/// The result has `rows = height` and `cols = width`: cell `(row, col)`
/// counts votes for a center at `(x = col, y = row)`. Candidate centers
/// outside the image are dropped.
pub fn hough_circles_acc(mask: &EdgeMask, radius: u32, sweep: AngleSweep) -> Result<Accumulator> {
    if radius == 0 {
        return Err(HoughError::config("circle radius must be positive"));
    }
    let offsets = sweep.offsets(f64::from(radius));
    let points = mask.edge_points();
    accumulate(&points, &offsets, mask.width(), mask.height())
}

#[cfg(feature = "rayon")]
fn accumulate(
    points: &[(usize, usize)],
    offsets: &[(f64, f64)],
    width: usize,
    height: usize,
) -> Result<Accumulator> {
    if points.len() <= POINTS_PER_TASK {
        return Ok(vote_points(points, offsets, width, height));
    }
    points
        .par_chunks(POINTS_PER_TASK)
        .map(|chunk| Ok(vote_points(chunk, offsets, width, height)))
        .try_reduce(
            || Accumulator::zeros(height, width),
            |mut total, partial| {
                total.merge(&partial)?;
                Ok(total)
            },
        )
}

#[cfg(not(feature = "rayon"))]
fn accumulate(
    points: &[(usize, usize)],
    offsets: &[(f64, f64)],
    width: usize,
    height: usize,
) -> Result<Accumulator> {
    Ok(vote_points(points, offsets, width, height))
}

fn vote_points(
    points: &[(usize, usize)],
    offsets: &[(f64, f64)],
    width: usize,
    height: usize,
) -> Accumulator {
    let mut acc = Accumulator::zeros(height, width);
    let (w, h) = (width as f64, height as f64);
    for &(x, y) in points {
        let (xf, yf) = (x as f64, y as f64);
        for &(dx, dy) in offsets {
            let a = (xf + dx).round();
            let b = (yf + dy).round();
            if a >= 0.0 && b >= 0.0 && a < w && b < h {
                acc.vote(b as usize, a as usize);
            }
        }
    }
    acc
}
