//! JSON configuration and report helpers for the `hough` CLI.

use hough_circles::{Circle, CircleSearchParams, CircleSearchResult};
use hough_core::Peak;
use hough_lines::{LineDetectionResult, LineDetectorParams, PolarLine};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// How an edge mask is derived from a grayscale image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeSource {
    /// Pixels strictly brighter than `level` are edges. Level 0 accepts any
    /// nonzero pixel, which suits precomputed edge images.
    Threshold { level: u8 },
    /// Canny edge detection with hysteresis thresholds `low <= high`.
    Canny { low: f32, high: f32 },
}

impl Default for EdgeSource {
    fn default() -> Self {
        EdgeSource::Threshold { level: 0 }
    }
}

/// Configuration for one detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoughConfig {
    pub image_path: String,
    #[serde(default)]
    pub edges: EdgeSource,
    #[serde(default)]
    pub lines: Option<LineDetectorParams>,
    #[serde(default)]
    pub circles: Option<CircleSearchParams>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub overlay_path: Option<String>,
}

impl HoughConfig {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            edges: EdgeSource::default(),
            lines: None,
            circles: None,
            output_path: None,
            overlay_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("hough_report.json"))
    }
}

/// Line section of a [`HoughReport`]. The accumulator itself is left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineReport {
    pub raw_peaks: Vec<Peak>,
    pub peaks: Vec<Peak>,
    pub lines: Vec<PolarLine>,
}

impl From<&LineDetectionResult> for LineReport {
    fn from(res: &LineDetectionResult) -> Self {
        Self {
            raw_peaks: res.raw_peaks.clone(),
            peaks: res.peaks.clone(),
            lines: res.lines.clone(),
        }
    }
}

/// Circle section of a [`HoughReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleReport {
    pub search: CircleSearchResult,
    pub circles: Vec<Circle>,
}

impl From<&CircleSearchResult> for CircleReport {
    fn from(res: &CircleSearchResult) -> Self {
        Self {
            search: res.clone(),
            circles: res.circles().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoughReport {
    pub image_path: String,
    pub width: u32,
    pub height: u32,
    pub edge_pixels: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circles: Option<CircleReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HoughReport {
    pub fn new(image_path: impl Into<String>, width: u32, height: u32, edge_pixels: usize) -> Self {
        Self {
            image_path: image_path.into(),
            width,
            height,
            edge_pixels,
            lines: None,
            circles: None,
            error: None,
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
