//! HTTP API for text reduction.
//!
//! `GET /health` reports whether the LLM is configured, `POST /reduce` shrinks
//! text through it. CORS is open so browser extensions can call the server.

use crate::config::{LlmSettings, Prompts};
use crate::llm::{check_health, Completer, Health};
use crate::reduce::{ReductionRequest, ReductionResponse, Reducer};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared, read-only server state.
pub struct AppState {
    llm: LlmSettings,
    /// Reducer, or why one could not be built.
    reducer: Result<Reducer, String>,
}

impl AppState {
    pub fn new(llm: LlmSettings, completer: Result<Arc<dyn Completer>, String>, prompts: Prompts) -> Self {
        Self {
            llm,
            reducer: completer.map(|c| Reducer::new(c, prompts)),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Router with both endpoints and permissive CORS.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/reduce", post(reduce))
        .layer(cors)
        .with_state(state)
}

/// Bind the API socket on `host:port`.
pub async fn bind(host: &str, port: u16) -> crate::Result<TcpListener> {
    Ok(TcpListener::bind((host, port)).await?)
}

/// Serve the API on an already bound listener until the process is stopped.
pub async fn run_server(listener: TcpListener, state: Arc<AppState>) -> crate::Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(check_health(&state.llm))
}

async fn reduce(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReductionRequest>,
) -> impl IntoResponse {
    let reducer = match &state.reducer {
        Ok(reducer) => reducer,
        Err(e) => return server_error(e.clone()),
    };

    match reducer.reduce(&req).await {
        Ok(response) => Json::<ReductionResponse>(response).into_response(),
        Err(e) => {
            error!("Reduction failed: {}", e);
            server_error(e.to_string())
        }
    }
}

fn server_error(detail: String) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { detail }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::tests::StubCompleter;
    use axum::body::to_bytes;

    fn state(completer: Result<Arc<dyn Completer>, String>) -> Arc<AppState> {
        let llm = LlmSettings {
            model: Some("stub/model".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        Arc::new(AppState::new(llm, completer, Prompts::default()))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(text: &str) -> ReductionRequest {
        ReductionRequest {
            text: text.to_string(),
            reduction_level: 50,
            prompt: None,
        }
    }

    #[tokio::test]
    async fn test_health_healthy() {
        let Json(health) = health(State(state(Err("unused".to_string())))).await;
        assert_eq!(
            serde_json::to_value(health).unwrap(),
            serde_json::json!({"status": "healthy", "model": "stub/model"})
        );
    }

    #[tokio::test]
    async fn test_health_missing_model() {
        let state = Arc::new(AppState::new(
            LlmSettings::default(),
            Err("no model".to_string()),
            Prompts::default(),
        ));
        let Json(health) = health(State(state)).await;
        assert_eq!(
            serde_json::to_value(health).unwrap(),
            serde_json::json!({
                "status": "unhealthy",
                "error": "LLM_MODEL environment variable not set"
            })
        );
    }

    #[tokio::test]
    async fn test_reduce_ok() {
        let completer: Arc<dyn Completer> = StubCompleter::replying("<p>a b</p>");
        let response = reduce(State(state(Ok(completer))), Json(request("a b c d")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reduced_text"], "<p>a b</p>");
        assert_eq!(body["original_length"], 4);
        assert_eq!(body["reduced_length"], 2);
        assert_eq!(body["reduction_percentage"], 50.0);
    }

    #[tokio::test]
    async fn test_reduce_llm_failure_is_500() {
        let completer: Arc<dyn Completer> = StubCompleter::failing("upstream down");
        let response = reduce(State(state(Ok(completer))), Json(request("a b")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["detail"].as_str().unwrap().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_reduce_without_client_is_500() {
        let response = reduce(
            State(state(Err("No API key for provider anthropic".to_string()))),
            Json(request("a b")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["detail"],
            "No API key for provider anthropic"
        );
    }

    #[tokio::test]
    async fn test_bind_reports_busy_port() {
        let first = bind("127.0.0.1", 0).await.unwrap();
        let port = first.local_addr().unwrap().port();
        assert_ne!(port, 0);

        let second = bind("127.0.0.1", port).await;
        assert!(matches!(second, Err(crate::ReductError::Io(_))));
    }
}
