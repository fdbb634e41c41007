//! HTTP client helpers for tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationBody {
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Status code, `X-Scorer-Status` header, and decoded JSON body.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub scorer_status: String,
    pub body: Value,
}

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<RawResponse, TestClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::read(resp).await
    }

    pub async fn evaluate_raw(&self, body: impl Into<String>) -> Result<RawResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url("/evaluate-answer"))
            .header("Content-Type", "application/json")
            .body(body.into())
            .send()
            .await?;
        Self::read(resp).await
    }

    /// Posts `{question, user_answer}` and expects a 200.
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<(EvaluationBody, String), TestClientError> {
        let body = serde_json::json!({"question": question, "user_answer": answer});
        let raw = self.evaluate_raw(body.to_string()).await?;

        match raw.status {
            200 => Ok((serde_json::from_value(raw.body)?, raw.scorer_status)),
            400 => Err(TestClientError::BadRequest(raw.body.to_string())),
            status => Err(TestClientError::UnexpectedStatus(status, raw.body.to_string())),
        }
    }

    async fn read(resp: reqwest::Response) -> Result<RawResponse, TestClientError> {
        let status = resp.status().as_u16();
        let scorer_status = resp
            .headers()
            .get("x-scorer-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = resp.json().await?;

        Ok(RawResponse {
            status,
            scorer_status,
            body,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}
