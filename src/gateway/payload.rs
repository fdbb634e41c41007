use serde::{Deserialize, Serialize};

/// Validated body of `POST /evaluate-answer`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub question: String,
    pub user_answer: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexResponse {
    pub status: String,
    pub message: String,
    pub model_loaded: bool,
    pub vectorizer_loaded: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub vectorizer_loaded: bool,
}

/// Error body. Carries the same score/feedback fields as a successful evaluation so
/// clients can render it without special casing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}
