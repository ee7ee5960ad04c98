//! Wire types for the optional remote-analysis service.
//!
//! Contract: `POST /process { image: <base64> }` returns
//! `{ answers: { "<q>": "<label>" | { option, fill } } }`. These are types
//! only — the engine performs no network I/O and must not assume network
//! availability. Hosts that call the service fall back to the local
//! deterministic pipeline on transport failure; that fallback is a product
//! decision of the surrounding app, not of this engine.

use std::collections::BTreeMap;

/// Request body for the remote analysis endpoint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteAnalysisRequest {
    /// Base64-encoded compressed image.
    pub image: String,
}

/// One remote answer: either a bare label or a detailed reading with a
/// fill ratio.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RemoteAnswer {
    Label(String),
    Detailed { option: String, fill: f64 },
}

impl RemoteAnswer {
    /// The selected option label regardless of wire form.
    pub fn label(&self) -> &str {
        match self {
            Self::Label(label) => label,
            Self::Detailed { option, .. } => option,
        }
    }
}

/// Response body of the remote analysis endpoint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteAnalysisResponse {
    pub answers: BTreeMap<String, RemoteAnswer>,
}

impl RemoteAnalysisResponse {
    /// Normalize to a `question_number -> label` map, rejecting
    /// non-numeric question keys.
    pub fn into_answer_map(self) -> Result<BTreeMap<u32, String>, String> {
        self.answers
            .into_iter()
            .map(|(q, answer)| {
                let number: u32 = q
                    .parse()
                    .map_err(|_| format!("invalid question number '{q}'"))?;
                Ok((number, answer.label().to_string()))
            })
            .collect()
    }
}
