//! Stage orchestration: detect → (calibrate) → resolve.

use crate::buffer::PixelBuffer;
use crate::config::ScanConfig;
use crate::detect::{detect_corners, fallback_quad};
use crate::geometry::Quad;
use crate::layout::SheetLayout;
use crate::resolve::resolve_bubbles;

use super::ScanResult;

/// Resolve all bubbles through a buffer-space quad snapshot.
///
/// The quad is taken by value: it is the snapshot for this run, and later
/// calibration mutations cannot reach it.
pub(crate) fn run(
    buffer: &PixelBuffer,
    quad: Quad,
    scale_factor: f64,
    layout: &SheetLayout,
    config: &ScanConfig,
) -> ScanResult {
    let answers = resolve_bubbles(buffer, &quad, layout, &config.resolve);
    let n_answered = answers.iter().filter(|a| a.selected.is_some()).count();
    tracing::info!(
        "{} of {} questions answered confidently",
        n_answered,
        answers.len()
    );

    ScanResult {
        answers,
        quad,
        scale_factor,
        image_size: buffer.size(),
    }
}

/// Seed a buffer-space quad from corner detection, falling back to the
/// fixed-margin rectangle when any quadrant fails.
///
/// Returns the quad and whether the fallback was used (a lower-confidence
/// state the host may surface, never an error).
pub(crate) fn auto_quad(buffer: &PixelBuffer, config: &ScanConfig) -> (Quad, bool) {
    let detection = detect_corners(buffer, &config.corner);
    match detection.quad() {
        Some(quad) if !quad.is_degenerate() => {
            tracing::info!("corner detection complete");
            (quad, false)
        }
        _ => {
            tracing::warn!(
                "corner detection incomplete ({} of 4 markers); using margin fallback",
                detection.n_found()
            );
            (
                fallback_quad(buffer.width(), buffer.height(), config.fallback_margin_px),
                true,
            )
        }
    }
}
