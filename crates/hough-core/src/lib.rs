//! Core types for Hough-transform shape detection.
//!
//! This crate is intentionally small and shape-agnostic. It owns the edge mask
//! consumed by every accumulator builder, the dense vote grid they produce,
//! and the non-maximum-suppression peak finder shared by line and circle
//! detection. Shape-specific voting lives in `hough-lines` and
//! `hough-circles`.
//!
//! Coordinates follow the image convention everywhere: `x` is the column,
//! `y` is the row, `(0, 0)` is the top-left pixel.

mod accumulator;
mod error;
mod image;
mod logger;
mod peaks;

pub use accumulator::Accumulator;
pub use error::{HoughError, Result};
pub use image::{EdgeMask, GrayImageView};
pub use peaks::{find_peaks, Neighborhood, Peak, PeakParams, Threshold};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, init_with_level_name};
