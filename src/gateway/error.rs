use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::gateway::SCORER_STATUS_HEADER;
use crate::gateway::payload::ErrorResponse;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body absent, not JSON, or not a non-empty object. The detail is logged only.
    #[error("Invalid request. Please provide JSON data.")]
    InvalidRequest { detail: String },

    #[error("user_answer is required")]
    MissingAnswer,

    #[error("Model not loaded. Please restart the server.")]
    ModelUnavailable,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest { .. } | GatewayError::MissingAnswer => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status_header(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest { .. } | GatewayError::MissingAnswer => "invalid_request",
            GatewayError::ModelUnavailable => "model_unavailable",
        }
    }

    fn client_feedback(&self) -> (&'static str, Vec<String>) {
        match self {
            GatewayError::InvalidRequest { .. } => ("Invalid request format.", vec![]),
            GatewayError::MissingAnswer => (
                "No answer provided.",
                vec!["Provide an answer to the question".to_string()],
            ),
            GatewayError::ModelUnavailable => ("System error. Please try again later.", vec![]),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            GatewayError::InvalidRequest { detail } => {
                tracing::debug!(detail = %detail, "Rejected malformed request");
            }
            GatewayError::ModelUnavailable => {
                tracing::error!("Evaluation requested but artifacts are not loaded");
            }
            GatewayError::MissingAnswer => {}
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            SCORER_STATUS_HEADER,
            HeaderValue::from_static(self.status_header()),
        );

        let (feedback, improvements) = self.client_feedback();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            score: 0,
            feedback: feedback.to_string(),
            strengths: vec![],
            improvements,
        });

        (status, headers, body).into_response()
    }
}
