//! High-level scanning API.
//!
//! [`Scanner`] is the primary entry point. It wraps a [`SheetLayout`] and a
//! [`ScanConfig`] and provides convenience methods for the common paths:
//! auto-calibrated scanning, user-corrected calibration, and raw compressed
//! bytes.

use crate::buffer::PixelBuffer;
use crate::calibration::{Calibration, CalibrationError};
use crate::config::ScanConfig;
use crate::decode::{decode_image, DecodeError};
use crate::layout::SheetLayout;
use crate::pipeline::{self, ScanResult, ScoreSummary};
use crate::score::{score_answers, AnswerKey};

/// Answer-sheet scanner.
///
/// Create once, scan many captures.
///
/// # Examples
///
/// ```no_run
/// use markgrid::{Scanner, SheetLayout};
///
/// let scanner = Scanner::new(SheetLayout::default());
/// let bytes = std::fs::read("sheet.jpg").unwrap();
/// let result = scanner.scan_bytes(&bytes).unwrap();
/// println!("{} questions answered", result.n_answered());
/// ```
pub struct Scanner {
    layout: SheetLayout,
    config: ScanConfig,
}

impl Scanner {
    /// Create a scanner for a sheet layout with default tuning.
    pub fn new(layout: SheetLayout) -> Self {
        Self {
            layout,
            config: ScanConfig::default(),
        }
    }

    /// Create with full config control.
    pub fn with_config(layout: SheetLayout, config: ScanConfig) -> Self {
        Self { layout, config }
    }

    /// The sheet layout being scanned.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Access the current configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut ScanConfig {
        &mut self.config
    }

    /// Scan with automatic calibration: detect the corner markers (falling
    /// back to the margin rectangle on any miss) and resolve all bubbles.
    ///
    /// The quad is already buffer-space, so the recorded scale factor is
    /// 1.0. Never fails below the decode boundary: a sheet with no
    /// detectable markers still produces a (low-confidence) result.
    pub fn scan(&self, buffer: &PixelBuffer) -> ScanResult {
        let (quad, used_fallback) = pipeline::auto_quad(buffer, &self.config);
        if used_fallback {
            tracing::debug!("scanning through fallback quad");
        }
        pipeline::run(buffer, quad, 1.0, &self.layout, &self.config)
    }

    /// Scan through user-corrected calibration state.
    ///
    /// Takes an immutable snapshot of the calibration quad at this call
    /// (copy-on-start): corner drags that happen while the run is in flight
    /// are not visible to it. Rejects the trigger on an invalid scale
    /// factor or degenerate quad, leaving the calibration state untouched.
    pub fn scan_with_calibration(
        &self,
        buffer: &PixelBuffer,
        calibration: &Calibration,
    ) -> Result<ScanResult, CalibrationError> {
        let quad = calibration.to_buffer_space()?;
        Ok(pipeline::run(
            buffer,
            quad,
            calibration.scale_factor(),
            &self.layout,
            &self.config,
        ))
    }

    /// Decode compressed image bytes (downscaling to the configured width)
    /// and scan with automatic calibration.
    pub fn scan_bytes(&self, bytes: &[u8]) -> Result<ScanResult, DecodeError> {
        let buffer = decode_image(bytes, self.config.max_decode_width)?;
        Ok(self.scan(&buffer))
    }

    /// Scan and grade in one call. The summary is `None` when the key is
    /// empty (manual grading).
    pub fn scan_and_score(
        &self,
        buffer: &PixelBuffer,
        key: &AnswerKey,
    ) -> (ScanResult, Option<ScoreSummary>) {
        let result = self.scan(buffer);
        let summary = score_answers(&result.answers, key);
        (result, summary)
    }
}
