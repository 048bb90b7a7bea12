//! High-level facade crate for the `hough-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the accumulator and peak-finding crates
//! - (feature-gated) end-to-end helpers that turn an `image::GrayImage` into
//!   an edge mask and run line or circle detection on it
//! - overlay rendering of detected lines and circles
//! - JSON configuration and report types shared with the `hough` CLI
//!
//! ## Quickstart
//!
//! ```no_run
//! use hough::detect::{self, EdgeSource};
//! use hough::lines::LineDetectorParams;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("edges.png")?.decode()?.to_luma8();
//! let res = detect::detect_lines(&img, EdgeSource::default(), LineDetectorParams::default())?;
//! for line in &res.lines {
//!     println!("rho = {}, theta = {} deg", line.rho, line.theta_deg);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `hough::core`: edge mask, accumulator, peak finder, logging.
//! - `hough::lines`: rho/theta accumulator, line detector and filter.
//! - `hough::circles`: per-radius center accumulator and radius scan.
//! - `hough::io`: JSON config / report.
//! - `hough::detect` (feature `image`): end-to-end helpers from `image::GrayImage`.
//! - `hough::render` (feature `image`): green overlays of lines and circles.

pub use hough_circles as circles;
pub use hough_core as core;
pub use hough_lines as lines;

pub use hough_circles::{find_circles, CircleSearchParams, CircleSearchResult};
pub use hough_core::{find_peaks, Accumulator, EdgeMask, HoughError, Peak, PeakParams};
pub use hough_lines::{filter_lines, hough_lines_acc, LineDetector, LineDetectorParams};

pub mod io;

#[cfg(feature = "image")]
pub mod detect;

#[cfg(feature = "image")]
pub mod render;

/// Install a `tracing` subscriber and forward `log` records into it.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let _ = tracing_log::LogTracer::init();
    hough_core::init_tracing(json);
}
