// Token fetch against a served router
//
// HttpTokenSource talks to /api/scribe-token over a real socket, with the
// ElevenLabs issuer replaced by a fixed fake.

use anyhow::{anyhow, Result};
use axum::{routing::get, Json, Router};
use scribe_notes::ai::TokenIssuer;
use scribe_notes::stream::StreamError;
use scribe_notes::token::{HttpTokenSource, TokenSource};
use scribe_notes::{create_router, AppState};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

struct FixedIssuer(Option<&'static str>);

#[async_trait::async_trait]
impl TokenIssuer for FixedIssuer {
    async fn issue(&self) -> Result<String> {
        self.0
            .map(str::to_string)
            .ok_or_else(|| anyhow!("invalid api key"))
    }
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn fetch(state: AppState) -> Result<String, StreamError> {
    let addr = spawn(create_router(state)).await;
    HttpTokenSource::new(format!("http://{}/api/scribe-token", addr))
        .fetch_token()
        .await
}

#[tokio::test]
async fn test_fetch_token_success() {
    let state = AppState::new().with_tokens(Arc::new(FixedIssuer(Some("abc"))));
    assert_eq!(fetch(state).await, Ok("abc".to_string()));
}

#[tokio::test]
async fn test_fetch_token_reports_endpoint_message() {
    // details wins over error when both are present
    let state = AppState::new().with_tokens(Arc::new(FixedIssuer(None)));
    assert_eq!(
        fetch(state).await,
        Err(StreamError::Token("invalid api key".to_string()))
    );

    assert_eq!(
        fetch(AppState::new()).await,
        Err(StreamError::Token("ELEVENLABS_API_KEY is not set".to_string()))
    );
}

#[tokio::test]
async fn test_fetch_token_without_token_field() {
    let app = Router::new()
        .route("/empty", get(|| async { Json(json!({})) }))
        .route("/blank", get(|| async { Json(json!({ "token": "" })) }));
    let addr = spawn(app).await;

    for path in ["empty", "blank"] {
        let source = HttpTokenSource::new(format!("http://{}/{}", addr, path));
        assert_eq!(source.fetch_token().await, Err(StreamError::MissingToken), "{}", path);
    }
}

#[tokio::test]
async fn test_fetch_token_unknown_route() {
    let addr = spawn(Router::new()).await;
    let source = HttpTokenSource::new(format!("http://{}/api/scribe-token", addr));

    // a 404 with no JSON body falls back to the generic message
    assert_eq!(
        source.fetch_token().await,
        Err(StreamError::Token("Token fetch failed".to_string()))
    );
}
