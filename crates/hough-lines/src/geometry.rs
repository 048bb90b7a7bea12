//! Project accumulator peaks back to image-space lines.

use hough_core::Peak;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::accumulator::LineHoughSpace;

/// Line in normal form: `x cos(theta) + y sin(theta) = rho`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarLine {
    pub rho: f64,
    pub theta_deg: f64,
}

/// Finite piece of a line in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p0: Point2<f64>,
    pub p1: Point2<f64>,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).norm()
    }
}

impl PolarLine {
    pub fn new(rho: f64, theta_deg: f64) -> Self {
        Self { rho, theta_deg }
    }

    /// Line parameters of a `(theta index, rho index)` peak.
    pub fn from_peak(peak: &Peak, space: &LineHoughSpace) -> Self {
        Self {
            rho: space.rho.value(peak.row),
            theta_deg: space.theta.deg(peak.col),
        }
    }

    #[inline]
    fn normal(&self) -> Vector2<f64> {
        let (s, c) = self.theta_deg.to_radians().sin_cos();
        Vector2::new(c, s)
    }

    /// Point of the line closest to the origin.
    pub fn foot_point(&self) -> Point2<f64> {
        Point2::from(self.normal() * self.rho)
    }

    /// Unit direction along the line.
    pub fn direction(&self) -> Vector2<f64> {
        let n = self.normal();
        Vector2::new(-n.y, n.x)
    }

    /// Signed distance of `p` from the line.
    pub fn signed_distance(&self, p: Point2<f64>) -> f64 {
        self.normal().dot(&p.coords) - self.rho
    }

    /// Segment reaching `half_length` pixels to both sides of the foot point.
    pub fn extended_segment(&self, half_length: f64) -> LineSegment {
        let foot = self.foot_point();
        let d = self.direction() * half_length;
        LineSegment {
            p0: foot + d,
            p1: foot - d,
        }
    }

    /// Part of the line inside `[0, width] x [0, height]`, if any.
    pub fn clip_to_image(&self, width: usize, height: usize) -> Option<LineSegment> {
        let foot = self.foot_point();
        let dir = self.direction();
        let bounds = [(foot.x, dir.x, width as f64), (foot.y, dir.y, height as f64)];

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for (p, d, hi) in bounds {
            if d.abs() < 1e-12 {
                if p < 0.0 || p > hi {
                    return None;
                }
                continue;
            }
            let t0 = (0.0 - p) / d;
            let t1 = (hi - p) / d;
            t_min = t_min.max(t0.min(t1));
            t_max = t_max.min(t0.max(t1));
        }
        if t_min > t_max {
            return None;
        }
        Some(LineSegment {
            p0: foot + dir * t_min,
            p1: foot + dir * t_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn foot_point_and_direction_are_orthogonal() {
        let line = PolarLine::new(10.0, 30.0);
        let foot = line.foot_point();
        assert_relative_eq!(foot.coords.norm(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(foot.coords.dot(&line.direction()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(line.signed_distance(foot), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn extended_segment_is_centered_on_foot_point() {
        let seg = PolarLine::new(5.0, 90.0).extended_segment(1000.0);
        assert_relative_eq!(seg.length(), 2000.0, epsilon = 1e-9);
        assert_relative_eq!(seg.p0.y, 5.0, epsilon = 1e-9);
        assert_relative_eq!(seg.p1.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn clips_vertical_line_to_image_height() {
        let seg = PolarLine::new(12.0, 0.0).clip_to_image(50, 40).unwrap();
        let (top, bottom) = if seg.p0.y < seg.p1.y {
            (seg.p0, seg.p1)
        } else {
            (seg.p1, seg.p0)
        };
        assert_relative_eq!(top.x, 12.0, epsilon = 1e-9);
        assert_relative_eq!(top.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bottom.y, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn clips_diagonal_line_to_corners() {
        // x - y = 0
        let seg = PolarLine::new(0.0, 135.0).clip_to_image(20, 20).unwrap();
        assert_relative_eq!(seg.length(), 20.0 * 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn line_outside_image_has_no_segment() {
        assert!(PolarLine::new(-5.0, 0.0).clip_to_image(10, 10).is_none());
        assert!(PolarLine::new(100.0, 45.0).clip_to_image(10, 10).is_none());
    }
}
