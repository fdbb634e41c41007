use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::gateway::SCORER_STATUS_HEADER;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::EvaluateRequest;
use crate::gateway::state::HandlerState;
use crate::model::{Classifier, Vectorizer};
use crate::scoring::Evaluation;

#[instrument(skip_all, fields(score = tracing::field::Empty))]
pub async fn evaluate_answer_handler<V, C>(
    State(state): State<HandlerState<V, C>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    V: Vectorizer + 'static,
    C: Classifier + 'static,
{
    let evaluator = state
        .evaluator
        .as_ref()
        .ok_or(GatewayError::ModelUnavailable)?;

    let Json(body) = body.map_err(|e| GatewayError::InvalidRequest {
        detail: e.body_text(),
    })?;
    let request = parse_evaluate_request(body)?;

    debug!(
        question_chars = request.question.chars().count(),
        answer_chars = request.user_answer.chars().count(),
        "Evaluating answer"
    );

    let evaluation = evaluator.evaluate_answer(&request.question, &request.user_answer);
    tracing::Span::current().record("score", evaluation.score);
    info!(
        score = evaluation.score,
        outcome = evaluation.outcome.as_header_value(),
        "Evaluation complete"
    );

    Ok(make_response(evaluation))
}

/// Validates the decoded body. Any JSON that is not a non-empty object is rejected,
/// as is a `user_answer` that is missing, empty, or not a string.
pub(crate) fn parse_evaluate_request(body: Value) -> Result<EvaluateRequest, GatewayError> {
    let Value::Object(mut fields) = body else {
        return Err(GatewayError::InvalidRequest {
            detail: "body is not a JSON object".to_string(),
        });
    };
    if fields.is_empty() {
        return Err(GatewayError::InvalidRequest {
            detail: "body is an empty object".to_string(),
        });
    }

    let user_answer = match fields.remove("user_answer") {
        Some(Value::String(answer)) if !answer.is_empty() => answer,
        _ => return Err(GatewayError::MissingAnswer),
    };

    let question = match fields.remove("question") {
        Some(Value::String(question)) => question,
        _ => String::new(),
    };

    Ok(EvaluateRequest {
        question,
        user_answer,
    })
}

pub(crate) fn make_response(evaluation: Evaluation) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SCORER_STATUS_HEADER,
        HeaderValue::from_static(evaluation.outcome.as_header_value()),
    );
    (StatusCode::OK, headers, Json(evaluation)).into_response()
}
