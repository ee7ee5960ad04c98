//! Answer keys and grading.

use std::collections::BTreeMap;
use std::path::Path;

use crate::pipeline::{ScanAnswer, ScoreSummary};

/// Mapping from 1-based question number to the correct option label.
///
/// Wire format is a JSON object with string question numbers:
/// `{"1":"A","2":"C"}`. An empty key means no external grading is
/// available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    entries: BTreeMap<u32, String>,
}

impl AnswerKey {
    /// An empty key (scoring becomes a no-op).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the correct label for a question.
    pub fn insert(&mut self, question_number: u32, label: impl Into<String>) {
        self.entries.insert(question_number, label.into());
    }

    /// Correct label for a question, if the key covers it.
    pub fn get(&self, question_number: u32) -> Option<&str> {
        self.entries.get(&question_number).map(String::as_str)
    }

    /// Number of questions the key covers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No grading available.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(question_number, label)` in question order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(&q, label)| (q, label.as_str()))
    }

    /// Parse the JSON wire form. Question numbers must be positive
    /// integers; labels must be non-empty.
    pub fn from_json_str(data: &str) -> Result<Self, String> {
        let raw: BTreeMap<String, String> =
            serde_json::from_str(data).map_err(|e| e.to_string())?;
        let mut entries = BTreeMap::new();
        for (q, label) in raw {
            let number: u32 = q
                .parse()
                .map_err(|_| format!("invalid question number '{q}'"))?;
            if number == 0 {
                return Err("question numbers are 1-based".to_string());
            }
            if label.trim().is_empty() {
                return Err(format!("empty label for question {number}"));
            }
            entries.insert(number, label);
        }
        Ok(Self { entries })
    }

    /// Load the JSON wire form from a file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data).map_err(Into::into)
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> String {
        let raw: BTreeMap<String, &str> = self
            .entries
            .iter()
            .map(|(q, label)| (q.to_string(), label.as_str()))
            .collect();
        serde_json::to_string(&raw).expect("string map serializes")
    }
}

/// Grade resolved answers against an answer key.
///
/// Returns `None` when the key is empty: "not graded" is an explicit
/// signal, never a zero score that could read as "all wrong". Questions
/// absent from an incomplete key count as empty, as do unanswered rows.
pub fn score_answers(answers: &[ScanAnswer], key: &AnswerKey) -> Option<ScoreSummary> {
    if key.is_empty() {
        return None;
    }
    let mut summary = ScoreSummary::default();
    for answer in answers {
        match (key.get(answer.question_number), answer.selected.as_deref()) {
            (Some(correct), Some(selected)) if selected == correct => summary.correct += 1,
            (Some(_), Some(_)) => summary.wrong += 1,
            _ => summary.empty += 1,
        }
    }
    Some(summary)
}
