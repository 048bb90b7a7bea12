//! Discretized parameter axes of the line accumulator.

use hough_core::{HoughError, Result};
use serde::{Deserialize, Serialize};

/// Uniformly spaced rho values, one per accumulator row.
///
/// Spans `[-ceil(rho_max) - 1, ceil(rho_max))` with `rho_max` the image
/// diagonal, so every `x cos t + y sin t` of an in-image pixel has a bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RhoAxis {
    start: f64,
    step: f64,
    len: usize,
}

impl RhoAxis {
    pub fn for_image(width: usize, height: usize, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(HoughError::config(format!(
                "rho resolution must be positive and finite, got {step}"
            )));
        }
        let w = width as f64;
        let h = height as f64;
        let rho_max = (w * w + h * h).sqrt().ceil();
        let start = -rho_max - 1.0;
        let stop = rho_max;
        let len = ((stop - start) / step).ceil() as usize;
        Ok(Self { start, step, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.value(i)).collect()
    }

    /// Bin of the value closest to `rho`, computed arithmetically.
    ///
    /// Returns `None` when `rho` is a full step or more away from every bin.
    #[inline]
    pub fn nearest_index(&self, rho: f64) -> Option<usize> {
        if self.len == 0 || !rho.is_finite() {
            return None;
        }
        let raw = ((rho - self.start) / self.step).round();
        let idx = raw.clamp(0.0, (self.len - 1) as f64) as usize;
        ((self.value(idx) - rho).abs() < self.step).then_some(idx)
    }
}

/// Strictly increasing angles in degrees with cached sin/cos tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ThetaAxis {
    degrees: Vec<f64>,
    cos: Vec<f64>,
    sin: Vec<f64>,
}

impl ThetaAxis {
    pub fn new(degrees: Vec<f64>) -> Result<Self> {
        if degrees.is_empty() {
            return Err(HoughError::config("theta axis is empty"));
        }
        if degrees.iter().any(|d| !d.is_finite()) {
            return Err(HoughError::config("theta axis contains non-finite angles"));
        }
        if degrees.windows(2).any(|w| w[1] <= w[0]) {
            return Err(HoughError::config("theta axis must be strictly increasing"));
        }
        let (sin, cos) = degrees.iter().map(|d| d.to_radians().sin_cos()).unzip();
        Ok(Self { degrees, cos, sin })
    }

    /// `start, start + step, ...` below `stop` (exclusive), like a numeric range.
    pub fn range(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(HoughError::config(format!(
                "theta step must be positive and finite, got {step}"
            )));
        }
        let n = ((stop - start) / step).ceil();
        if !n.is_finite() || n < 1.0 {
            return Err(HoughError::config(format!(
                "theta range [{start}, {stop}) with step {step} is empty"
            )));
        }
        Self::new((0..n as usize).map(|i| start + i as f64 * step).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    #[inline]
    pub fn deg(&self, index: usize) -> f64 {
        self.degrees[index]
    }

    #[inline]
    pub fn cos(&self, index: usize) -> f64 {
        self.cos[index]
    }

    #[inline]
    pub fn sin(&self, index: usize) -> f64 {
        self.sin[index]
    }
}

impl Default for ThetaAxis {
    /// 0..179 degrees, one bin per degree.
    fn default() -> Self {
        let degrees: Vec<f64> = (0..180).map(f64::from).collect();
        let (sin, cos) = degrees.iter().map(|d| d.to_radians().sin_cos()).unzip();
        Self { degrees, cos, sin }
    }
}

impl TryFrom<Vec<f64>> for ThetaAxis {
    type Error = HoughError;

    fn try_from(degrees: Vec<f64>) -> Result<Self> {
        Self::new(degrees)
    }
}

impl From<ThetaAxis> for Vec<f64> {
    fn from(axis: ThetaAxis) -> Self {
        axis.degrees
    }
}
