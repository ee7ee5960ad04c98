//! Export payload for downstream persistence.
//!
//! The JSON shape (camelCase keys) is consumed by an external grading
//! service; field names are wire contract, not style. The engine only
//! builds the value — transport and storage belong to the host.

use std::collections::BTreeMap;

/// Student identity attached to an exported result.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StudentRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Exam identity attached to an exported result.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExamRef {
    pub id: String,
    pub title: String,
}

/// Detected and manually-overridden scores plus the raw answer map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    /// Score from the automatic reading, 0-100. `None` when no key was
    /// available.
    pub detected_score: Option<u32>,
    /// Question number -> selected label; `null` for unanswered questions.
    pub detected_answers: BTreeMap<u32, Option<String>>,
    /// Teacher-entered override, if any.
    pub manual_score: Option<u32>,
    /// The score downstream systems persist: the manual override when
    /// present, otherwise the detected score.
    pub final_score: Option<u32>,
}

/// Complete export payload.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    /// ISO 8601 timestamp supplied by the caller.
    pub export_date: String,
    pub student: StudentRef,
    pub exam: ExamRef,
    pub result: ExportResult,
}

impl ExportPayload {
    /// Assemble a payload, deriving `final_score` from the manual override
    /// when one is present.
    pub fn new(
        export_date: impl Into<String>,
        student: StudentRef,
        exam: ExamRef,
        detected_score: Option<u32>,
        detected_answers: BTreeMap<u32, Option<String>>,
        manual_score: Option<u32>,
    ) -> Self {
        let final_score = manual_score.or(detected_score);
        Self {
            export_date: export_date.into(),
            student,
            exam,
            result: ExportResult {
                detected_score,
                detected_answers,
                manual_score,
                final_score,
            },
        }
    }
}
