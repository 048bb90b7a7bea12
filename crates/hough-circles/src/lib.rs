//! Circle Hough transform over a caller-supplied list of radii.
//!
//! For each radius every edge pixel votes for the centers lying at that
//! distance ([`hough_circles_acc`]); [`find_circles`] runs the shared peak
//! finder on each per-radius accumulator with a threshold relative to that
//! accumulator's own maximum.
//!
//! Accumulators are `height x width`; a center peak is `(col, row)` = `(x, y)`.

mod accumulator;
mod search;

pub use accumulator::{hough_circles_acc, AngleSweep};
pub use search::{find_circles, Circle, CircleSearchParams, CircleSearchResult, RadiusRange};
