//! markgrid — deterministic optical mark recognition for answer sheets.
//!
//! Turns a photographed bubble-sheet image into a structured set of
//! per-question selected options. The pipeline stages are:
//!
//! 1. **Decode** – compressed image bytes to a downscaled RGBA pixel buffer.
//! 2. **Detect** – locate the four dark corner markers, one per image
//!    quadrant, falling back to a fixed-margin rectangle when detection
//!    fails.
//! 3. **Calibrate** – hold the user-adjustable corner quad and the
//!    display-to-buffer scale factor; analysis runs on an immutable
//!    snapshot.
//! 4. **Resolve** – project each (question row, option column) through the
//!    quad, sample a circular region mean intensity, and select the filled
//!    option under a two-part confidence gate.
//! 5. **Score** – compare resolved answers against an optional answer key.
//!
//! # Public API
//! [`Scanner`] and [`SheetLayout`] are the primary entry points, with
//! [`ScanConfig`] for tuning. The engine is pure and synchronous: no UI
//! binding, no network I/O, no hidden mutable state.

mod buffer;
mod calibration;
mod config;
mod decode;
mod detect;
mod export;
mod geometry;
mod layout;
mod pipeline;
mod remote;
mod resolve;
mod scanner;
mod score;

#[cfg(test)]
mod test_utils;

pub use buffer::PixelBuffer;
pub use calibration::{Calibration, CalibrationError};
pub use config::ScanConfig;
pub use decode::{decode_image, DecodeError};
pub use detect::{detect_corners, fallback_quad, CornerDetectConfig, CornerDetection};
pub use export::{ExamRef, ExportPayload, ExportResult, StudentRef};
pub use geometry::{Corner, Point, Quad};
pub use layout::SheetLayout;
pub use pipeline::{ScanAnswer, ScanResult, ScoreSummary};
pub use remote::{RemoteAnalysisRequest, RemoteAnalysisResponse, RemoteAnswer};
pub use resolve::{resolve_bubbles, ResolveConfig};
pub use scanner::Scanner;
pub use score::{score_answers, AnswerKey};
