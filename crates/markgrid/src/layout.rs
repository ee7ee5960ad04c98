//! Runtime sheet layout specification.
//!
//! Layout JSON follows a parametric schema (`markgrid.sheet.v1`): option
//! column positions and the question row band are normalized coordinates in
//! `[0, 1]` inside the calibration quad. Per-bubble coordinate lists are
//! intentionally not part of the schema; rows are generated at runtime by
//! linear spacing.

use std::path::Path;

const SHEET_SCHEMA_V1: &str = "markgrid.sheet.v1";

const DEFAULT_NAME: &str = "markgrid_a4_5opt";
const DEFAULT_OPTIONS: [&str; 5] = ["A", "B", "C", "D", "E"];
const DEFAULT_COLUMN_U: [f64; 5] = [0.18, 0.34, 0.50, 0.66, 0.82];
const DEFAULT_QUESTION_COUNT: u32 = 20;
const DEFAULT_ROW_V_START: f64 = 0.10;
const DEFAULT_ROW_V_END: f64 = 0.95;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetLayoutSpecV1 {
    schema: String,
    name: String,
    options: Vec<String>,
    question_count: u32,
    column_u: Vec<f64>,
    row_v_start: f64,
    row_v_end: f64,
}

/// Bubble layout used by the resolver.
///
/// Option order is significant: it defines column position and breaks ties
/// when two bubbles read equally dark.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub name: String,
    pub options: Vec<String>,
    pub question_count: u32,
    pub column_u: Vec<f64>,
    pub row_v_start: f64,
    pub row_v_end: f64,
}

impl SheetLayout {
    /// Number of option columns per question.
    pub fn n_options(&self) -> usize {
        self.options.len()
    }

    /// Option label at a column index.
    pub fn option_label(&self, idx: usize) -> Option<&str> {
        self.options.get(idx).map(String::as_str)
    }

    /// Normalized row coordinate of question index `q` (0-based), linearly
    /// spaced between `row_v_start` and `row_v_end`.
    ///
    /// A single-question layout pins the row to `row_v_start`.
    pub fn row_v(&self, q: u32) -> f64 {
        if self.question_count <= 1 {
            return self.row_v_start;
        }
        let step = (self.row_v_end - self.row_v_start) / (self.question_count - 1) as f64;
        self.row_v_start + q as f64 * step
    }

    /// Load a sheet layout from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data).map_err(Into::into)
    }

    /// Parse a sheet layout from JSON text.
    pub fn from_json_str(data: &str) -> Result<Self, String> {
        let spec: SheetLayoutSpecV1 = serde_json::from_str(data).map_err(|e| e.to_string())?;
        Self::from_layout_spec(spec)
    }

    fn from_layout_spec(spec: SheetLayoutSpecV1) -> Result<Self, String> {
        if spec.schema != SHEET_SCHEMA_V1 {
            return Err(format!(
                "unsupported sheet schema '{}' (expected '{}')",
                spec.schema, SHEET_SCHEMA_V1
            ));
        }
        let layout = Self {
            name: spec.name,
            options: spec.options,
            question_count: spec.question_count,
            column_u: spec.column_u,
            row_v_start: spec.row_v_start,
            row_v_end: spec.row_v_end,
        };
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("sheet name must not be empty".to_string());
        }
        if self.options.len() < 2 {
            return Err("layout needs at least 2 options".to_string());
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err("option labels must not be empty".to_string());
        }
        if self.column_u.len() != self.options.len() {
            return Err(format!(
                "column_u has {} entries for {} options",
                self.column_u.len(),
                self.options.len()
            ));
        }
        if self
            .column_u
            .iter()
            .any(|&u| !u.is_finite() || !(0.0..=1.0).contains(&u))
        {
            return Err("column_u entries must be finite and in [0, 1]".to_string());
        }
        if self.question_count == 0 {
            return Err("question_count must be >= 1".to_string());
        }
        for (label, v) in [
            ("row_v_start", self.row_v_start),
            ("row_v_end", self.row_v_end),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(format!("{label} must be finite and in [0, 1]"));
            }
        }
        if self.row_v_start >= self.row_v_end {
            return Err("row_v_start must be < row_v_end".to_string());
        }
        Ok(())
    }

    /// Same layout with an overridden question count, re-validated.
    ///
    /// Convenience for exams whose answer key determines the count at
    /// runtime.
    pub fn with_question_count(&self, question_count: u32) -> Result<Self, String> {
        let mut out = self.clone();
        out.question_count = question_count;
        out.validate()?;
        Ok(out)
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        let spec = SheetLayoutSpecV1 {
            schema: SHEET_SCHEMA_V1.to_string(),
            name: DEFAULT_NAME.to_string(),
            options: DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect(),
            question_count: DEFAULT_QUESTION_COUNT,
            column_u: DEFAULT_COLUMN_U.to_vec(),
            row_v_start: DEFAULT_ROW_V_START,
            row_v_end: DEFAULT_ROW_V_END,
        };
        Self::from_layout_spec(spec).expect("default sheet spec must be valid")
    }
}
