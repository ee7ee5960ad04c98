//! Pipeline orchestration and result types.
//!
//! Algorithmic primitives live in `crate::detect`, `crate::resolve`, and
//! `crate::score`. This layer owns stage call order, the quad snapshot
//! discipline (analysis operates on a copy taken at invocation; concurrent
//! calibration mutations are invisible to a running analysis), and the
//! stage-boundary logging.

mod result;
mod run;

pub use result::{ScanAnswer, ScanResult, ScoreSummary};

pub(crate) use run::{auto_quad, run};
