//! Image decoding: compressed bytes to a downscaled RGBA pixel buffer.
//!
//! Downscaling is mandatory, not cosmetic: it bounds the cost of every
//! later O(width × height) scan and is the single biggest performance lever
//! in the pipeline.

use crate::buffer::PixelBuffer;

/// Errors from image decoding.
///
/// Fatal to the run: the caller must retake or re-pick the photo. Nothing
/// below the decoder boundary produces an unrecoverable failure.
#[derive(Debug)]
pub enum DecodeError {
    /// The underlying codec rejected the input.
    Image(image::ImageError),
    /// Decoded image (or requested target width) has a zero dimension.
    ZeroDimension,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(e) => write!(f, "image decode failed: {e}"),
            Self::ZeroDimension => write!(f, "image or target width has a zero dimension"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(e) => Some(e),
            Self::ZeroDimension => None,
        }
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

/// Decode compressed image bytes and downscale so `width <= max_width`,
/// preserving aspect ratio.
///
/// The result is interleaved RGBA. Images already at or below `max_width`
/// are not resampled.
pub fn decode_image(bytes: &[u8], max_width: u32) -> Result<PixelBuffer, DecodeError> {
    if max_width == 0 {
        return Err(DecodeError::ZeroDimension);
    }
    let decoded = image::load_from_memory(bytes)?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(DecodeError::ZeroDimension);
    }

    let decoded = if decoded.width() > max_width {
        tracing::debug!(
            from_width = decoded.width(),
            to_width = max_width,
            "downscaling decoded image"
        );
        decoded.resize(max_width, u32::MAX, image::imageops::FilterType::Triangle)
    } else {
        decoded
    };

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroDimension);
    }
    PixelBuffer::new(width, height, rgba.into_raw()).map_err(|_| DecodeError::ZeroDimension)
}
