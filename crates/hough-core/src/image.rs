use serde::{Deserialize, Serialize};

use crate::error::{HoughError, Result};

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl GrayImageView<'_> {
    #[inline]
    fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

/// Binary edge image. `true` marks an edge pixel.
///
/// Produced by an external edge detector; every accumulator builder treats it
/// as read-only input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMask {
    width: usize,
    height: usize,
    data: Vec<bool>, // row-major
}

impl EdgeMask {
    /// All-background mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<bool>) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(HoughError::InvalidMaskBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Pixels strictly brighter than `level` become edges.
    ///
    /// `level = 0` keeps every nonzero pixel, which is what a pre-computed
    /// 0/255 edge image needs.
    pub fn from_gray(src: &GrayImageView<'_>, level: u8) -> Result<Self> {
        let expected = src.width * src.height;
        if src.data.len() != expected {
            return Err(HoughError::InvalidMaskBuffer {
                expected,
                got: src.data.len(),
            });
        }
        Ok(Self::from_fn(src.width, src.height, |x, y| {
            src.get(x, y) > level
        }))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.data[y * self.width + x]
    }

    /// Mark `(x, y)` as edge. Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Edge pixels as `(x, y)` in row-major scan order.
    pub fn edge_points(&self) -> Vec<(usize, usize)> {
        let w = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(|(i, _)| (i % w, i / w))
            .collect()
    }

    /// Length of the image diagonal, `sqrt(width² + height²)`.
    pub fn diagonal(&self) -> f64 {
        let w = self.width as f64;
        let h = self.height as f64;
        (w * w + h * h).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_points_follow_row_major_order() {
        let mut mask = EdgeMask::new(4, 3);
        mask.set(3, 0, true);
        mask.set(1, 2, true);
        mask.set(0, 1, true);
        assert_eq!(mask.edge_points(), vec![(3, 0), (0, 1), (1, 2)]);
        assert_eq!(mask.edge_count(), 3);
    }

    #[test]
    fn from_gray_thresholds_strictly_above_level() {
        let data = [0u8, 10, 200, 255, 0, 11];
        let view = GrayImageView {
            width: 3,
            height: 2,
            data: &data,
        };
        let mask = EdgeMask::from_gray(&view, 10).unwrap();
        assert!(!mask.is_edge(1, 0));
        assert!(mask.is_edge(2, 0));
        assert!(mask.is_edge(0, 1));
        assert!(mask.is_edge(2, 1));
        assert_eq!(mask.edge_count(), 3);
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = EdgeMask::from_vec(3, 3, vec![false; 8]).unwrap_err();
        assert_eq!(
            err,
            HoughError::InvalidMaskBuffer {
                expected: 9,
                got: 8
            }
        );
    }

    #[test]
    fn out_of_bounds_queries_are_background() {
        let mut mask = EdgeMask::new(2, 2);
        mask.set(5, 5, true);
        assert_eq!(mask.edge_count(), 0);
        assert!(!mask.is_edge(5, 0));
    }
}
