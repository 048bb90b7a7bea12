use hough_core::{find_peaks, EdgeMask, Peak, PeakParams, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::accumulator::{hough_lines_acc, LineAccumulatorParams, LineHoughSpace};
use crate::filter::{filter_lines, LineFilterParams};
use crate::geometry::PolarLine;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Parameters for end-to-end line detection on an edge mask.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDetectorParams {
    pub accumulator: LineAccumulatorParams,
    pub peaks: PeakParams,
    /// Keep only clustered peaks. `None` disables filtering.
    pub filter: Option<LineFilterParams>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineDetectionResult {
    pub space: LineHoughSpace,
    /// Peaks straight from the peak finder.
    pub raw_peaks: Vec<Peak>,
    /// Peaks after the optional filter.
    pub peaks: Vec<Peak>,
    /// `peaks` converted to line parameters.
    pub lines: Vec<PolarLine>,
}

/// Accumulate, find peaks, optionally filter.
pub struct LineDetector {
    params: LineDetectorParams,
}

impl LineDetector {
    pub fn new(params: LineDetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LineDetectorParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, mask), fields(width = mask.width(), height = mask.height()))
    )]
    pub fn detect(&self, mask: &EdgeMask) -> Result<LineDetectionResult> {
        self.params.peaks.validate()?;
        let space = hough_lines_acc(mask, &self.params.accumulator)?;
        let raw_peaks = find_peaks(&space.accumulator, &self.params.peaks)?;

        let peaks = match &self.params.filter {
            Some(filter) => {
                let kept = filter_lines(&raw_peaks, filter);
                debug!("line filter kept {} of {} peaks", kept.len(), raw_peaks.len());
                kept
            }
            None => raw_peaks.clone(),
        };

        let lines = peaks
            .iter()
            .map(|p| PolarLine::from_peak(p, &space))
            .collect();

        Ok(LineDetectionResult {
            space,
            raw_peaks,
            peaks,
            lines,
        })
    }
}
