//! Result structures produced by a pipeline run.

use std::collections::BTreeMap;

use crate::geometry::Quad;

/// One question's reading.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScanAnswer {
    /// 1-based question number.
    pub question_number: u32,
    /// Selected option label, or `None` when no bubble passed the
    /// confidence gate ("needs manual review", not an error).
    pub selected: Option<String>,
    /// Region mean luma per option column, in layout column order. Kept for
    /// auditability and debug overlays.
    pub option_intensities: Vec<f64>,
}

/// Full result of one "run analysis" action.
///
/// Immutable once produced; a new run replaces it entirely. Carries the
/// exact quad and scale factor used, so the host can draw a debug overlay
/// or audit the reading.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScanResult {
    /// One answer per question, in question order.
    pub answers: Vec<ScanAnswer>,
    /// The buffer-space quad snapshot the run sampled through.
    pub quad: Quad,
    /// Display-to-buffer scale factor in effect (1.0 for buffer-space
    /// calibration).
    pub scale_factor: f64,
    /// Decoded image dimensions `[width, height]`.
    pub image_size: [u32; 2],
}

impl ScanResult {
    /// Number of questions with a confidently selected option.
    pub fn n_answered(&self) -> usize {
        self.answers.iter().filter(|a| a.selected.is_some()).count()
    }

    /// Question number → selected label map (`None` for unanswered), the
    /// form consumed by exports and answer-key comparison.
    pub fn answer_map(&self) -> BTreeMap<u32, Option<String>> {
        self.answers
            .iter()
            .map(|a| (a.question_number, a.selected.clone()))
            .collect()
    }
}

/// Grading counts against an answer key.
///
/// Invariant: `correct + wrong + empty == question_count` whenever a key is
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ScoreSummary {
    pub correct: u32,
    pub wrong: u32,
    pub empty: u32,
}

impl ScoreSummary {
    /// Total questions graded.
    pub fn total(&self) -> u32 {
        self.correct + self.wrong + self.empty
    }

    /// Correct answers as a 0–100 percentage, rounded to nearest. `None`
    /// when nothing was graded.
    pub fn percent(&self) -> Option<u32> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(((self.correct as f64 / total as f64) * 100.0).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Quad};

    fn sample_result() -> ScanResult {
        ScanResult {
            answers: vec![
                ScanAnswer {
                    question_number: 1,
                    selected: Some("A".to_string()),
                    option_intensities: vec![10.0, 220.0],
                },
                ScanAnswer {
                    question_number: 2,
                    selected: None,
                    option_intensities: vec![200.0, 210.0],
                },
            ],
            quad: Quad::new(
                Point::new(0.0, 0.0),
                Point::new(800.0, 0.0),
                Point::new(0.0, 1000.0),
                Point::new(800.0, 1000.0),
            ),
            scale_factor: 1.0,
            image_size: [800, 1000],
        }
    }

    #[test]
    fn answer_map_preserves_unanswered_rows() {
        let result = sample_result();
        assert_eq!(result.n_answered(), 1);
        let map = result.answer_map();
        assert_eq!(map[&1], Some("A".to_string()));
        assert_eq!(map[&2], None);
    }

    #[test]
    fn result_json_round_trips() {
        let result = sample_result();
        let json = serde_json::to_string(&result).expect("serialize");
        let back: ScanResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.answers, result.answers);
        assert_eq!(back.image_size, result.image_size);
    }

    #[test]
    fn percent_rounds_and_signals_empty_grading() {
        let s = ScoreSummary {
            correct: 2,
            wrong: 1,
            empty: 0,
        };
        assert_eq!(s.percent(), Some(67));
        assert_eq!(ScoreSummary::default().percent(), None);
    }
}
