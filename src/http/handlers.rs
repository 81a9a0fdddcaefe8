use super::state::AppState;
use crate::ai::{self, ActionsResponse, Models, ToolError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of every AI tool request
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl TextRequest {
    fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            details: None,
        }),
    )
        .into_response()
}

/// Unwrap a JSON body, answering malformed ones with `{ error }` and 400
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            Err(error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
        }
    }
}

fn missing_models() -> Response {
    error!("Gemini API key is missing");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Missing Gemini API Key")
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/scribe-token
/// Mint a single-use realtime transcription token
pub async fn scribe_token(State(state): State<AppState>) -> Response {
    let Some(issuer) = state.tokens else {
        error!("ELEVENLABS_API_KEY is not set");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ELEVENLABS_API_KEY is not set",
        );
    };

    match issuer.issue().await {
        Ok(token) => (StatusCode::OK, Json(TokenResponse { token })).into_response(),
        Err(e) => {
            error!("Failed to fetch token: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch token".to_string(),
                    details: Some(format!("{:#}", e)),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/ai/summarize
pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let Some(text) = req.text() else {
        return error_response(StatusCode::BAD_REQUEST, "Missing text");
    };
    let Some(models) = state.models else {
        return missing_models();
    };

    match ai::summarize(models.json.as_ref(), text).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            error!("Summarize failed: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// POST /api/ai/format
pub async fn format(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let Some(text) = req.text() else {
        return error_response(StatusCode::BAD_REQUEST, "Missing text");
    };
    let Some(models) = state.models else {
        return missing_models();
    };

    match ai::format(models.json.as_ref(), text).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            error!("Format failed: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to format text")
        }
    }
}

/// POST /api/ai/flowchart
pub async fn flowchart(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let Some(models) = state.models else {
        return missing_models();
    };
    let Some(text) = req.text() else {
        return error_response(StatusCode::BAD_REQUEST, "Text content is required");
    };

    match ai::flowchart(models.flowchart.as_ref(), text).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(ToolError::InvalidOutput { raw }) => {
            error!("Failed to parse flowchart response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate valid flow data", "raw": raw })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Flowchart generation failed: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// POST /api/ai/extract-actions
pub async fn extract_actions(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let Some(text) = req.text() else {
        return error_response(StatusCode::BAD_REQUEST, "No text provided");
    };
    let Some(Models { json: model, .. }) = state.models else {
        return missing_models();
    };

    match ai::extract_actions(model.as_ref(), text).await {
        Ok(actions) => {
            info!("Extracted {} actions", actions.len());
            (StatusCode::OK, Json(ActionsResponse { actions })).into_response()
        }
        Err(e) => {
            error!("Action extraction failed: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Extraction failed")
        }
    }
}

/// POST /api/gumloop
/// Forward a conversation to the Gumloop webhook and relay its response
pub async fn gumloop(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let conversation = match body.get("conversation").and_then(Value::as_str) {
        Some(c) if !c.is_empty() => c,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing or invalid 'conversation'",
            )
        }
    };

    let Some(client) = state.gumloop else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Missing GUMLOOP_WEBHOOK");
    };

    match client.start(conversation).await {
        Ok(relayed) => {
            let status =
                StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                [(header::CONTENT_TYPE, relayed.content_type)],
                relayed.body,
            )
                .into_response()
        }
        Err(e) => {
            error!("Gumloop request failed: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
