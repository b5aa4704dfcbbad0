//! HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/config` | Brand, links, whitelist, and facts, as loaded |
//! | `GET`  | `/api/sss` | The FAQ list, as loaded |
//! | `POST` | `/api/ask` | Answer `{ "text": "..." }` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Every error response has the shape:
//!
//! ```json
//! { "error": "question text must not be empty" }
//! ```
//!
//! `400` for an empty question or an unreadable body, `500` for a missing
//! credential or any upstream failure.
//!
//! # CORS
//!
//! All origins are permitted for `GET` and `POST` so that a browser chat
//! page served from anywhere can call the API.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use hr_faq_core::models::{AskRequest, AskResponse, ErrorResponse};

use crate::ask::{AskError, AskService};
use crate::config::Config;
use crate::data::{load_data, HrData};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<HrData>,
    pub ask: Arc<AskService>,
}

/// Starts the HTTP server.
///
/// Loads the JSON data, builds the answer pipeline, embeds the FAQ questions,
/// and serves until Ctrl-C or SIGTERM. A failed warm-up is logged and retried
/// lazily on the first question, so the config and FAQ endpoints come up even
/// when the embedding service is unreachable.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let data = Arc::new(load_data(&config.data)?);
    let ask = Arc::new(AskService::from_config(config, &data)?);

    tracing::info!(
        brand = %data.config.brand,
        faq_entries = data.faq.len(),
        "data loaded"
    );

    match ask.matcher().warm_up().await {
        Ok(n) => tracing::info!(entries = n, "FAQ index warmed up"),
        Err(e) => tracing::warn!(error = %format!("{:#}", e), "FAQ warm-up failed; will retry on first question"),
    }

    let app = router(AppState { data, ask });
    let bind_addr = config.server.bind_addr();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Builds the router with CORS and request logging.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/config", get(handle_config))
        .route("/api/sss", get(handle_faq))
        .route("/api/ask", post(handle_ask))
        .route("/health", get(handle_health))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    tracing::info!(method = %req.method(), path = %req.uri().path(), "request");
    next.run(req).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
}

// ============ Error response ============

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

impl From<AskError> for ApiError {
    fn from(err: AskError) -> Self {
        match err {
            AskError::EmptyQuestion => bad_request(err.to_string()),
            AskError::MissingCredential(_) => {
                tracing::error!("{}", err);
                internal(err.to_string())
            }
            AskError::Upstream(ref e) => {
                tracing::error!(error = %format!("{:#}", e), "ask failed");
                internal(err.to_string())
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/config, GET /api/sss ============

async fn handle_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.data.config_json.clone())
}

async fn handle_faq(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.data.faq_json.clone())
}

// ============ POST /api/ask ============

/// Handler for `POST /api/ask`.
///
/// An unreadable body is reported as `400` in the same `{ "error" }` shape
/// as every other failure.
async fn handle_ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    let resp = state.ask.ask(&req.text).await?;
    tracing::info!(source = resp.source.as_str(), "answer sent");
    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ask::tests::{data, service, FakeCompleter};
    use crate::matcher::tests::{embedder, FakeEmbedder};
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use tower::ServiceExt;

    fn app(embedder: FakeEmbedder, completer: FakeCompleter) -> Router {
        router(AppState {
            data: Arc::new(data()),
            ask: Arc::new(service(Arc::new(embedder), completer)),
        })
    }

    async fn send(app: Router, req: HttpRequest<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ask_request(body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri("/api/ask")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_text_is_400() {
        for body in [r#"{"text":""}"#, r#"{"text":"   "}"#, "{}"] {
            let (status, json) =
                send(app(embedder(), FakeCompleter::Reply("x")), ask_request(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(json["error"], "question text must not be empty");
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_400_even_when_upstream_is_down() {
        let (status, _) = send(
            app(FakeEmbedder::failing(), FakeCompleter::NoKey),
            ask_request(r#"{"text":""}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (status, json) = send(
            app(embedder(), FakeCompleter::Reply("x")),
            ask_request("{ not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_ask_faq_answer() {
        let (status, json) = send(
            app(embedder(), FakeCompleter::Reply("model")),
            ask_request(r#"{"text":"Staj başvurusu nasıl yapılır?"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["answer"], "Kariyer sayfasından.");
        assert_eq!(json["source"], "sss");
    }

    #[tokio::test]
    async fn test_ask_model_answer() {
        let (status, json) = send(
            app(embedder(), FakeCompleter::Reply("Genellikle evet.")),
            ask_request(r#"{"text":"Yemek var mı?"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["source"], "openai");
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let (status, json) = send(
            app(embedder(), FakeCompleter::NoKey),
            ask_request(r#"{"text":"Yemek var mı?"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "OPENAI_API_KEY is not set");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let (status, json) = send(
            app(FakeEmbedder::failing(), FakeCompleter::Reply("x")),
            ask_request(r#"{"text":"Staj?"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_config_served_verbatim() {
        let (status, json) = send(
            app(embedder(), FakeCompleter::Reply("x")),
            get_request("/api/config"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, data().config_json);
        assert_eq!(json["links"]["contact"], "https://example.com/iletisim");
    }

    #[tokio::test]
    async fn test_faq_served() {
        let (status, json) = send(
            app(embedder(), FakeCompleter::Reply("x")),
            get_request("/api/sss"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["q"], "Staj başvurusu nasıl yapılır?");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(
            app(embedder(), FakeCompleter::Reply("x")),
            get_request("/health"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }
}
