//! Per-quadrant dark-marker corner detection.
//!
//! Each image quadrant is scanned at a fixed stride for pixels darker than
//! an absolute threshold. Every candidate gets a local "box score": the
//! count of strided neighbors that are also below threshold. The best-scored
//! candidate per quadrant wins; a quadrant with no sufficiently dense
//! candidate reports a miss rather than a bogus corner.
//!
//! Known limitation: this assumes exactly one strong dark marker per
//! quadrant and will misfire on noisy backgrounds. Callers handle misses by
//! falling back to a fixed-margin rectangle (see [`fallback_quad`]).

use crate::buffer::PixelBuffer;
use crate::geometry::{Corner, Point, Quad};

/// Configuration for corner marker detection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CornerDetectConfig {
    /// Scan stride over quadrant pixels.
    pub scan_stride: u32,
    /// Absolute luma threshold below which a pixel counts as dark.
    pub darkness_threshold: f64,
    /// Half-extent (pixels) of the neighborhood scored around a candidate.
    pub box_radius_px: u32,
    /// Stride within the scored neighborhood.
    pub box_stride: u32,
    /// Minimum box score for a quadrant to yield a corner.
    pub min_box_score: u32,
}

impl Default for CornerDetectConfig {
    fn default() -> Self {
        Self {
            scan_stride: 4,
            darkness_threshold: 100.0,
            box_radius_px: 10,
            box_stride: 5,
            min_box_score: 5,
        }
    }
}

/// Best-effort detection outcome: one optional corner per quadrant, in
/// [`Corner::ALL`] order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CornerDetection {
    pub corners: [Option<Point>; 4],
}

impl CornerDetection {
    /// Corner found for a given quadrant, if any.
    pub fn corner(&self, which: Corner) -> Option<Point> {
        self.corners[corner_index(which)]
    }

    /// Number of quadrants that produced a corner.
    pub fn n_found(&self) -> usize {
        self.corners.iter().filter(|c| c.is_some()).count()
    }

    /// All four corners found.
    pub fn is_complete(&self) -> bool {
        self.n_found() == 4
    }

    /// Assemble the detected quad; `None` unless all four corners were
    /// found.
    pub fn quad(&self) -> Option<Quad> {
        Some(Quad::new(
            self.corners[0]?,
            self.corners[1]?,
            self.corners[2]?,
            self.corners[3]?,
        ))
    }
}

fn corner_index(which: Corner) -> usize {
    match which {
        Corner::TopLeft => 0,
        Corner::TopRight => 1,
        Corner::BottomLeft => 2,
        Corner::BottomRight => 3,
    }
}

/// Locate the four sheet corner markers, one per image quadrant.
///
/// Returned points are in buffer space. Per-quadrant misses are reported as
/// `None`, never as an error.
pub fn detect_corners(buffer: &PixelBuffer, config: &CornerDetectConfig) -> CornerDetection {
    let mut corners = [None; 4];
    for which in Corner::ALL {
        let found = find_quadrant_corner(buffer, config, which);
        if found.is_none() {
            tracing::debug!(corner = %which, "no dark marker found in quadrant");
        }
        corners[corner_index(which)] = found;
    }
    CornerDetection { corners }
}

/// Scan one quadrant for its marker. Returns the dark candidate with the
/// densest dark neighborhood, or `None` when the best score is below
/// `min_box_score`.
fn find_quadrant_corner(
    buffer: &PixelBuffer,
    config: &CornerDetectConfig,
    which: Corner,
) -> Option<Point> {
    let (w, h) = (buffer.width(), buffer.height());
    let (half_w, half_h) = (w / 2, h / 2);
    let (x_range, y_range) = match which {
        Corner::TopLeft => (0..half_w, 0..half_h),
        Corner::TopRight => (half_w..w, 0..half_h),
        Corner::BottomLeft => (0..half_w, half_h..h),
        Corner::BottomRight => (half_w..w, half_h..h),
    };

    let stride = config.scan_stride.max(1) as usize;
    let mut best: Option<(Point, u32)> = None;

    for y in y_range.step_by(stride) {
        for x in x_range.clone().step_by(stride) {
            let (xf, yf) = (x as f64, y as f64);
            if buffer.luma(xf, yf) >= config.darkness_threshold {
                continue;
            }
            let score = box_score(buffer, config, xf, yf);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((Point::new(xf, yf), score));
            }
        }
    }

    match best {
        Some((point, score)) if score >= config.min_box_score => Some(point),
        _ => None,
    }
}

/// Count strided neighbors within `±box_radius_px` (the candidate itself
/// included) that are below the darkness threshold. Neighbor samples clamp
/// at image edges.
fn box_score(buffer: &PixelBuffer, config: &CornerDetectConfig, x: f64, y: f64) -> u32 {
    let r = config.box_radius_px as i64;
    let step = config.box_stride.max(1) as i64;
    let mut score = 0;
    let mut by = -r;
    while by <= r {
        let mut bx = -r;
        while bx <= r {
            if buffer.luma(x + bx as f64, y + by as f64) < config.darkness_threshold {
                score += 1;
            }
            bx += step;
        }
        by += step;
    }
    score
}

/// Deterministic fallback: a rectangle inset from the image bounds.
///
/// Used when any quadrant fails detection, so calibration always has a
/// usable starting quad and the user flow never blocks. The margin is
/// clamped to a quarter of the smaller dimension so the quad cannot
/// degenerate on tiny images.
pub fn fallback_quad(width: u32, height: u32, margin: f64) -> Quad {
    let (w, h) = (width as f64, height as f64);
    let m = margin.clamp(0.0, 0.25 * w.min(h));
    Quad::new(
        Point::new(m, m),
        Point::new(w - m, m),
        Point::new(m, h - m),
        Point::new(w - m, h - m),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{draw_corner_markers, Canvas};

    #[test]
    fn finds_all_four_markers_on_a_clean_sheet() {
        let (w, h) = (400, 500);
        let mut canvas = Canvas::new(w, h, 255);
        draw_corner_markers(&mut canvas, w, h, 20);
        let buf = canvas.into_buffer();

        let detection = detect_corners(&buf, &CornerDetectConfig::default());
        assert!(detection.is_complete());

        let quad = detection.quad().expect("complete detection");
        // Each corner lands on its marker square (inset 20, side 14).
        assert!(quad.top_left.x <= 40.0 && quad.top_left.y <= 40.0);
        assert!(quad.top_right.x >= 360.0 && quad.top_right.y <= 40.0);
        assert!(quad.bottom_left.x <= 40.0 && quad.bottom_left.y >= 460.0);
        assert!(quad.bottom_right.x >= 360.0 && quad.bottom_right.y >= 460.0);
        assert!(!quad.is_degenerate());
    }

    #[test]
    fn all_white_buffer_yields_no_corners() {
        let buf = Canvas::new(200, 200, 255).into_buffer();
        let detection = detect_corners(&buf, &CornerDetectConfig::default());
        assert_eq!(detection.n_found(), 0);
        assert!(detection.quad().is_none());
    }

    #[test]
    fn sparse_dark_speck_is_rejected_by_min_box_score() {
        let mut canvas = Canvas::new(200, 200, 255);
        // Single dark pixel: box score 1, below the default minimum of 5.
        canvas.set_rgb(30, 30, [0, 0, 0]);
        let buf = canvas.into_buffer();
        let detection = detect_corners(&buf, &CornerDetectConfig::default());
        assert!(detection.corner(Corner::TopLeft).is_none());
    }

    #[test]
    fn partial_detection_reports_the_misses() {
        let (w, h) = (400, 400);
        let mut canvas = Canvas::new(w, h, 255);
        // Only the top-left marker is printed.
        canvas.fill_rect(20, 20, 34, 34, 0);
        let buf = canvas.into_buffer();

        let detection = detect_corners(&buf, &CornerDetectConfig::default());
        assert_eq!(detection.n_found(), 1);
        assert!(detection.corner(Corner::TopLeft).is_some());
        assert!(detection.quad().is_none());
    }

    #[test]
    fn fallback_quad_is_inset_and_never_degenerate() {
        let quad = fallback_quad(800, 1000, 40.0);
        assert_eq!(quad.top_left, Point::new(40.0, 40.0));
        assert_eq!(quad.bottom_right, Point::new(760.0, 960.0));
        assert!(!quad.is_degenerate());

        // Oversized margin is clamped on a tiny image.
        let tiny = fallback_quad(8, 8, 40.0);
        assert!(!tiny.is_degenerate());
    }

    #[test]
    fn detection_is_deterministic() {
        let (w, h) = (300, 300);
        let mut canvas = Canvas::new(w, h, 255);
        draw_corner_markers(&mut canvas, w, h, 16);
        let buf = canvas.into_buffer();
        let cfg = CornerDetectConfig::default();

        let a = detect_corners(&buf, &cfg);
        let b = detect_corners(&buf, &cfg);
        assert_eq!(a.corners.map(|c| c.map(|p| (p.x, p.y))), b.corners.map(|c| c.map(|p| (p.x, p.y))));
    }
}
