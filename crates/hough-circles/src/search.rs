//! Radius scan: one accumulator and one peak search per candidate radius.

use hough_core::{find_peaks, EdgeMask, HoughError, Neighborhood, Peak, PeakParams, Result, Threshold};
use log::{debug, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::accumulator::{hough_circles_acc, AngleSweep};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Inclusive radius range `min, min + step, ..., <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusRange {
    pub min: u32,
    pub max: u32,
    #[serde(default = "default_radius_step")]
    pub step: u32,
}

fn default_radius_step() -> u32 {
    1
}

impl RadiusRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max, step: 1 }
    }

    pub fn radii(&self) -> Result<Vec<u32>> {
        if self.step == 0 {
            return Err(HoughError::config("radius step must be positive"));
        }
        if self.min == 0 || self.min > self.max {
            return Err(HoughError::config(format!(
                "radius range [{}, {}] is empty or starts at zero",
                self.min, self.max
            )));
        }
        Ok((self.min..=self.max).step_by(self.step as usize).collect())
    }
}

/// Parameters for [`find_circles`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleSearchParams {
    /// Radii to scan, in order.
    pub radii: Vec<u32>,
    /// Peaks must reach this fraction of the per-radius accumulator maximum.
    pub relative_threshold: f32,
    /// Maximum number of centers per radius.
    pub num_peaks: usize,
    /// Suppression window; `None` derives it from the image size.
    pub neighborhood: Option<Neighborhood>,
    pub sweep: AngleSweep,
}

impl Default for CircleSearchParams {
    fn default() -> Self {
        Self {
            radii: Vec::new(),
            relative_threshold: 0.75,
            num_peaks: 10,
            neighborhood: None,
            sweep: AngleSweep::Half,
        }
    }
}

impl CircleSearchParams {
    pub fn with_radii(radii: Vec<u32>) -> Self {
        Self {
            radii,
            ..Self::default()
        }
    }

    pub fn with_range(range: RadiusRange) -> Result<Self> {
        Ok(Self::with_radii(range.radii()?))
    }

    fn peak_params(&self) -> PeakParams {
        PeakParams {
            num_peaks: self.num_peaks,
            threshold: Threshold::RelativeToMax(self.relative_threshold),
            neighborhood: self.neighborhood,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.radii.is_empty() {
            return Err(HoughError::config("radius list is empty"));
        }
        if self.radii.contains(&0) {
            return Err(HoughError::config("radius list contains zero"));
        }
        self.peak_params().validate()
    }
}

/// Detected circle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
    pub votes: u32,
}

/// Parallel center / radius lists in radius-scan order, then discovery order.
///
/// Centers are `(col, row)` = `(x, y)` peaks. The same circle may appear at
/// several neighboring radii.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CircleSearchResult {
    pub centers: Vec<Peak>,
    pub radii: Vec<u32>,
}

impl CircleSearchResult {
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn circles(&self) -> impl Iterator<Item = Circle> + '_ {
        self.centers.iter().zip(&self.radii).map(|(c, &r)| Circle {
            center: Point2::new(c.col as f64, c.row as f64),
            radius: f64::from(r),
            votes: c.votes,
        })
    }
}

/// Scan every radius and collect the centers found for each.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(mask, params),
        fields(width = mask.width(), height = mask.height(), radii = params.radii.len())
    )
)]
pub fn find_circles(mask: &EdgeMask, params: &CircleSearchParams) -> Result<CircleSearchResult> {
    params.validate()?;
    if mask.edge_count() == 0 {
        warn!("edge mask has no edge pixels, no circles to find");
    }

    let per_radius = search_all(mask, params)?;

    let mut result = CircleSearchResult::default();
    for (radius, centers) in params.radii.iter().zip(per_radius) {
        result.radii.extend(std::iter::repeat_n(*radius, centers.len()));
        result.centers.extend(centers);
    }
    Ok(result)
}

#[cfg(feature = "rayon")]
fn search_all(mask: &EdgeMask, params: &CircleSearchParams) -> Result<Vec<Vec<Peak>>> {
    params
        .radii
        .par_iter()
        .map(|&r| search_radius(mask, r, params))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn search_all(mask: &EdgeMask, params: &CircleSearchParams) -> Result<Vec<Vec<Peak>>> {
    params
        .radii
        .iter()
        .map(|&r| search_radius(mask, r, params))
        .collect()
}

fn search_radius(mask: &EdgeMask, radius: u32, params: &CircleSearchParams) -> Result<Vec<Peak>> {
    let acc = hough_circles_acc(mask, radius, params.sweep)?;
    let centers = find_peaks(&acc, &params.peak_params())?;
    debug!(
        "radius {radius}: {} centers (max votes {})",
        centers.len(),
        acc.max_value()
    );
    Ok(centers)
}
