//! Straight-line Hough transform.
//!
//! Pipeline:
//! - vote every edge pixel into a rho/theta accumulator ([`hough_lines_acc`]),
//! - extract peaks with `hough_core::find_peaks`,
//! - optionally keep only clustered, near-parallel peaks ([`filter_lines`]),
//! - map peaks back to image lines ([`PolarLine`]).
//!
//! Lines use the normal form `rho = x cos(theta) + y sin(theta)` with `x` the
//! image column and `y` the image row. Peaks are `(col, row)` pairs, i.e.
//! `(theta index, rho index)`.

mod accumulator;
mod axis;
mod detector;
mod filter;
mod geometry;

pub use accumulator::{hough_lines_acc, LineAccumulatorParams, LineHoughSpace};
pub use axis::{RhoAxis, ThetaAxis};
pub use detector::{LineDetectionResult, LineDetector, LineDetectorParams};
pub use filter::{filter_lines, LineFilterParams};
pub use geometry::{LineSegment, PolarLine};
