//! Shared test utilities: synthetic answer-sheet rendering.
//!
//! Consolidated here so detector, resolver, and scanner tests draw their
//! fixtures the same way instead of each keeping a private copy.

use crate::buffer::PixelBuffer;

/// Mutable RGBA scratch image for building test fixtures.
pub(crate) struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with the gray value `background` (alpha 255).
    pub(crate) fn new(width: u32, height: u32, background: u8) -> Self {
        let mut data = vec![background; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub(crate) fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i] = rgb[0];
        self.data[i + 1] = rgb[1];
        self.data[i + 2] = rgb[2];
    }

    /// Fill an axis-aligned rectangle with a uniform gray value. Bounds are
    /// clipped to the canvas.
    pub(crate) fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, gray: u8) {
        let xa = x0.max(0) as u32;
        let ya = y0.max(0) as u32;
        let xb = (x1.min(self.width as i64 - 1)).max(0) as u32;
        let yb = (y1.min(self.height as i64 - 1)).max(0) as u32;
        for y in ya..=yb {
            for x in xa..=xb {
                self.set_rgb(x, y, [gray, gray, gray]);
            }
        }
    }

    /// Fill a disc of radius `r` centered at `(cx, cy)` with a gray value.
    pub(crate) fn fill_disc(&mut self, cx: f64, cy: f64, r: f64, gray: u8) {
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.set_rgb(x as u32, y as u32, [gray, gray, gray]);
                }
            }
        }
    }

    pub(crate) fn into_buffer(self) -> PixelBuffer {
        PixelBuffer::new(self.width, self.height, self.data).expect("canvas dimensions are valid")
    }
}

/// Render a sheet with the four dark corner marker squares the detector
/// expects, one per quadrant, inset by `inset` pixels.
pub(crate) fn draw_corner_markers(canvas: &mut Canvas, width: u32, height: u32, inset: i64) {
    let side = 14;
    let w = width as i64;
    let h = height as i64;
    canvas.fill_rect(inset, inset, inset + side, inset + side, 0);
    canvas.fill_rect(w - inset - side, inset, w - inset, inset + side, 0);
    canvas.fill_rect(inset, h - inset - side, inset + side, h - inset, 0);
    canvas.fill_rect(w - inset - side, h - inset - side, w - inset, h - inset, 0);
}
