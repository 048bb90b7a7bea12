//! Rho/theta voting.

use hough_core::{Accumulator, EdgeMask, HoughError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::axis::{RhoAxis, ThetaAxis};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Edge points handed to one worker when accumulating in parallel.
#[cfg(feature = "rayon")]
const POINTS_PER_TASK: usize = 512;

/// Discretization of the line parameter space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineAccumulatorParams {
    /// Distance between successive rho bins, in pixels.
    pub rho_resolution: f64,
    /// Theta bins, in degrees.
    pub theta: ThetaAxis,
}

impl Default for LineAccumulatorParams {
    fn default() -> Self {
        Self {
            rho_resolution: 1.0,
            theta: ThetaAxis::default(),
        }
    }
}

/// Filled line accumulator together with the axes that index it.
///
/// Rows follow `rho`, columns follow `theta`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineHoughSpace {
    pub accumulator: Accumulator,
    pub theta: ThetaAxis,
    pub rho: RhoAxis,
}

/// Vote every edge pixel into the rho/theta accumulator.
///
/// Each pixel `(x, y)` votes once per theta bin for
/// `rho = round(x cos(theta) + y sin(theta))`.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(mask, params),
        fields(width = mask.width(), height = mask.height(), thetas = params.theta.len())
    )
)]
pub fn hough_lines_acc(mask: &EdgeMask, params: &LineAccumulatorParams) -> Result<LineHoughSpace> {
    let rho = RhoAxis::for_image(mask.width(), mask.height(), params.rho_resolution)?;
    let theta = params.theta.clone();

    let points = mask.edge_points();
    if points.is_empty() {
        warn!("edge mask has no edge pixels, line accumulator stays empty");
    }

    let accumulator = accumulate(&points, &theta, &rho)?;
    debug!(
        "line accumulator {}x{} from {} edge pixels",
        accumulator.rows(),
        accumulator.cols(),
        points.len()
    );

    Ok(LineHoughSpace {
        accumulator,
        theta,
        rho,
    })
}

#[cfg(feature = "rayon")]
fn accumulate(points: &[(usize, usize)], theta: &ThetaAxis, rho: &RhoAxis) -> Result<Accumulator> {
    if points.len() <= POINTS_PER_TASK {
        return vote_points(points, theta, rho);
    }
    points
        .par_chunks(POINTS_PER_TASK)
        .map(|chunk| vote_points(chunk, theta, rho))
        .try_reduce(
            || Accumulator::zeros(rho.len(), theta.len()),
            |mut total, partial| {
                total.merge(&partial)?;
                Ok(total)
            },
        )
}

#[cfg(not(feature = "rayon"))]
fn accumulate(points: &[(usize, usize)], theta: &ThetaAxis, rho: &RhoAxis) -> Result<Accumulator> {
    vote_points(points, theta, rho)
}

fn vote_points(points: &[(usize, usize)], theta: &ThetaAxis, rho: &RhoAxis) -> Result<Accumulator> {
    let mut acc = Accumulator::zeros(rho.len(), theta.len());
    for &(x, y) in points {
        let (xf, yf) = (x as f64, y as f64);
        for t in 0..theta.len() {
            let d = (xf * theta.cos(t) + yf * theta.sin(t)).round();
            let row = rho
                .nearest_index(d)
                .ok_or(HoughError::RhoOutOfRange {
                    rho: d,
                    theta_deg: theta.deg(t),
                })?;
            acc.vote(row, t);
        }
    }
    Ok(acc)
}
