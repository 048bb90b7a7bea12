//! Overlay rendering of detected lines and circles onto the source image.

use crate::detect::DetectError;
use crate::{circles, core, lines};
use ::image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use std::path::Path;

const OVERLAY_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// How an infinite `(rho, theta)` line is turned into a drawable segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineProjection {
    /// Extend `half_length` pixels both ways from the foot of the normal.
    Extended { half_length: f64 },
    /// Clip to the image rectangle; lines missing the image are skipped.
    ClipToImage,
}

impl Default for LineProjection {
    fn default() -> Self {
        LineProjection::Extended {
            half_length: 1000.0,
        }
    }
}

fn to_rgb(gray: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(gray.clone()).to_rgb8()
}

/// Draw every peak of `space` as a green 1-px line on a copy of `gray`.
pub fn draw_lines(
    gray: &GrayImage,
    peaks: &[core::Peak],
    space: &lines::LineHoughSpace,
    projection: LineProjection,
) -> RgbImage {
    let mut out = to_rgb(gray);
    for peak in peaks {
        let line = lines::PolarLine::from_peak(peak, space);
        let segment = match projection {
            LineProjection::Extended { half_length } => Some(line.extended_segment(half_length)),
            LineProjection::ClipToImage => {
                line.clip_to_image(gray.width() as usize, gray.height() as usize)
            }
        };
        if let Some(seg) = segment {
            draw_line_segment_mut(
                &mut out,
                (seg.p0.x as f32, seg.p0.y as f32),
                (seg.p1.x as f32, seg.p1.y as f32),
                OVERLAY_COLOR,
            );
        }
    }
    out
}

/// Draw every detected circle as a green hollow circle on a copy of `gray`.
pub fn draw_circles(gray: &GrayImage, result: &circles::CircleSearchResult) -> RgbImage {
    let mut out = to_rgb(gray);
    for (center, &radius) in result.centers.iter().zip(&result.radii) {
        draw_hollow_circle_mut(
            &mut out,
            (center.col as i32, center.row as i32),
            radius as i32,
            OVERLAY_COLOR,
        );
    }
    out
}

/// Write an overlay; the format follows the file extension.
pub fn save_overlay(img: &RgbImage, path: impl AsRef<Path>) -> Result<(), DetectError> {
    img.save(path)?;
    Ok(())
}
