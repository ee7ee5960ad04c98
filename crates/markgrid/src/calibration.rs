//! Calibration state: the user-adjustable corner quad plus the
//! display-to-buffer scale factor.
//!
//! This is the only mutable value in the pipeline. The quad lives in
//! display space (the coordinate space the host shows the user); every
//! downstream stage reads an immutable buffer-space snapshot taken at the
//! moment analysis is triggered, so corner drags during a run are never
//! visible to that run.

use crate::geometry::{Corner, Point, Quad};

/// Errors raised when converting calibration state for analysis.
///
/// Both reject the analysis trigger and leave the calibration state
/// untouched; the user keeps dragging from where they were.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Scale factor is non-finite or not strictly positive.
    InvalidScale(f64),
    /// The current quad is degenerate (coincident or collinear corners).
    DegenerateQuad,
}

impl std::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidScale(s) => write!(f, "invalid scale factor {s}"),
            Self::DegenerateQuad => write!(f, "calibration quad is degenerate"),
        }
    }
}

impl std::error::Error for CalibrationError {}

/// Mutable calibration value: display-space quad + scale factor.
///
/// Seeded from corner detection (or the margin fallback), then corrected by
/// user drags. No other component mutates the quad. Serializable so hosts
/// can persist and restore a session's calibration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Calibration {
    quad: Quad,
    scale_factor: f64,
}

impl Calibration {
    /// Seed from a detected or default quad and the buffer-to-display width
    /// ratio.
    pub fn seed(quad: Quad, scale_factor: f64) -> Self {
        Self { quad, scale_factor }
    }

    /// Seed with the scale factor derived from buffer and display widths.
    pub fn from_widths(quad: Quad, buffer_width: u32, display_width: f64) -> Self {
        Self::seed(quad, buffer_width as f64 / display_width)
    }

    /// Replace one corner wholesale (no partial coordinate updates).
    pub fn move_corner(&mut self, which: Corner, new_point: Point) {
        self.quad.set_corner(which, new_point);
    }

    /// Snapshot of the current display-space quad.
    pub fn quad(&self) -> Quad {
        self.quad
    }

    /// Current display-to-buffer scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Convert the current quad into buffer space by applying the scale
    /// factor uniformly to all four points.
    ///
    /// Fails on a non-finite or non-positive scale factor, or when the
    /// scaled quad is degenerate.
    pub fn to_buffer_space(&self) -> Result<Quad, CalibrationError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(CalibrationError::InvalidScale(self.scale_factor));
        }
        let scaled = self.quad.scaled(self.scale_factor);
        if scaled.is_degenerate() {
            return Err(CalibrationError::DegenerateQuad);
        }
        Ok(scaled)
    }
}
