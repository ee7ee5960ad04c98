//! Decoded pixel storage and grayscale intensity sampling.
//!
//! Luma is computed on demand from the interleaved RGBA bytes; no full
//! grayscale frame is materialized. All sampling clamps coordinates into
//! bounds so slight calibration overshoot near image edges degrades
//! gracefully instead of failing.

/// Immutable RGBA pixel buffer produced by the decoder.
///
/// Owned exclusively by the pipeline run that created it; a retake replaces
/// it entirely.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap interleaved RGBA bytes.
    ///
    /// Fails when either dimension is zero or `data.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("pixel buffer dimensions must be non-zero".to_string());
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(format!(
                "pixel buffer length {} does not match {}x{} RGBA ({} bytes)",
                data.len(),
                width,
                height,
                expected
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `[width, height]`, the form carried in scan results.
    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    /// Raw interleaved RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Grayscale intensity `0.299 R + 0.587 G + 0.114 B` at the pixel
    /// nearest `(x, y)`.
    ///
    /// Coordinates are clamped into `[0, width-1] × [0, height-1]`; out of
    /// range input never panics and never indexes out of bounds.
    pub fn luma(&self, x: f64, y: f64) -> f64 {
        let xx = x.clamp(0.0, (self.width - 1) as f64) as usize;
        let yy = y.clamp(0.0, (self.height - 1) as f64) as usize;
        let i = (yy * self.width as usize + xx) * 4;
        0.299 * self.data[i] as f64 + 0.587 * self.data[i + 1] as f64 + 0.114 * self.data[i + 2] as f64
    }

    /// Mean luma over all pixels within Euclidean distance `r` of
    /// `(cx, cy)`.
    ///
    /// Returns 255.0 (paper white) when no pixel falls inside the radius,
    /// e.g. for a non-positive or non-finite radius.
    pub fn region_mean_luma(&self, cx: f64, cy: f64, r: f64) -> f64 {
        if !(r.is_finite() && cx.is_finite() && cy.is_finite()) {
            return 255.0;
        }
        let rr = r * r;
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;

        let mut sum = 0.0;
        let mut count = 0u64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                if dx * dx + dy * dy <= rr {
                    sum += self.luma(x as f64, y as f64);
                    count += 1;
                }
            }
        }
        if count == 0 {
            255.0
        } else {
            sum / count as f64
        }
    }
}
