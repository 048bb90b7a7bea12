use crate::{circles, core, lines};
use ::image::GrayImage;
use log::debug;

pub use crate::io::EdgeSource;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Hough(#[from] core::HoughError),
}

/// Convert an `image::GrayImage` into the lightweight `hough-core` view type.
pub fn gray_view(img: &GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Build an edge mask from a grayscale image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img), fields(width = img.width(), height = img.height()))
)]
pub fn edge_mask_from_image(
    img: &GrayImage,
    source: EdgeSource,
) -> Result<core::EdgeMask, DetectError> {
    let mask = match source {
        EdgeSource::Threshold { level } => core::EdgeMask::from_gray(&gray_view(img), level)?,
        EdgeSource::Canny { low, high } => {
            if !(low.is_finite() && high.is_finite()) || low < 0.0 || low > high {
                return Err(core::HoughError::config(format!(
                    "canny thresholds must satisfy 0 <= low <= high (got low={low}, high={high})"
                ))
                .into());
            }
            let edges = imageproc::edges::canny(img, low, high);
            core::EdgeMask::from_gray(&gray_view(&edges), 0)?
        }
    };
    debug!(
        "edge mask {}x{}: {} edge pixels",
        mask.width(),
        mask.height(),
        mask.edge_count()
    );
    Ok(mask)
}

/// Run line detection end-to-end: edges -> accumulator -> peaks -> optional filter.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, params),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_lines(
    img: &GrayImage,
    source: EdgeSource,
    params: lines::LineDetectorParams,
) -> Result<lines::LineDetectionResult, DetectError> {
    let mask = edge_mask_from_image(img, source)?;
    let detector = lines::LineDetector::new(params);
    Ok(detector.detect(&mask)?)
}

/// Run the circle radius scan end-to-end on an image.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, params),
        fields(width = img.width(), height = img.height(), radii = params.radii.len())
    )
)]
pub fn detect_circles(
    img: &GrayImage,
    source: EdgeSource,
    params: &circles::CircleSearchParams,
) -> Result<circles::CircleSearchResult, DetectError> {
    let mask = edge_mask_from_image(img, source)?;
    Ok(circles::find_circles(&mask, params)?)
}

/// Wrap a raw row-major 8-bit buffer as an `image::GrayImage`.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<GrayImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidGrayDimensions { width, height })
}

pub fn detect_lines_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    source: EdgeSource,
    params: lines::LineDetectorParams,
) -> Result<lines::LineDetectionResult, DetectError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    detect_lines(&img, source, params)
}

pub fn detect_circles_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    source: EdgeSource,
    params: &circles::CircleSearchParams,
) -> Result<circles::CircleSearchResult, DetectError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    detect_circles(&img, source, params)
}
