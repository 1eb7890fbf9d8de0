//! HTTP server mode exposing the pipeline as a REST endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::pipeline::Pipeline;

/// App state shared across handlers
pub struct AppState<T> {
    pipeline: Arc<Pipeline<T>>,
    source_url: Arc<str>,
    shutdown: CancellationToken,
}

impl<T> AppState<T> {
    /// Create state for a pipeline starting at `source_url`
    pub fn new(pipeline: Pipeline<T>, source_url: impl Into<Arc<str>>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            source_url: source_url.into(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token cancelled when the server shuts down; in-flight fetches observe it
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            source_url: Arc::clone(&self.source_url),
            shutdown: self.shutdown.clone(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    kind: &'static str,
    message: String,
}

impl ErrorBody {
    fn from_error(err: &Error) -> Self {
        Self {
            error: ErrorDetail {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

/// Build the router with `/healthcheck` and `/fetch`
pub fn router<T: Transport + 'static>(state: AppState<T>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/fetch", get(fetch::<T>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C
pub async fn serve(config: &AppConfig, host: &str, port: u16) -> Result<()> {
    let pipeline = config.pipeline()?;
    let state = AppState::new(pipeline, config.source.url.as_str());
    let shutdown = state.shutdown_token();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {host}:{port}: {e}")))?;
    tracing::info!("Starting HTTP server on http://{host}:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down HTTP server");
            }
            shutdown.cancel();
        })
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Liveness check
async fn healthcheck() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// Run the pipeline and return the projected records
async fn fetch<T: Transport + 'static>(State(state): State<AppState<T>>) -> Response {
    let cancel = state.shutdown.child_token();
    match state.pipeline.run(&state.source_url, &cancel).await {
        Ok(output) => {
            tracing::info!(
                "Served {} records from {} pages",
                output.stats.records_kept,
                output.stats.pages_fetched
            );
            Json(output.records).into_response()
        }
        Err(e) => {
            tracing::error!("Fetch failed: {e}");
            (status_for(&e), Json(ErrorBody::from_error(&e))).into_response()
        }
    }
}

/// HTTP status for a failed run
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        e if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        e if e.is_fetch_error() => StatusCode::BAD_GATEWAY,
        Error::Projection { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::FetchLimits;
    use crate::testing::{character, page, three_page_transport, MockTransport, PAGE_1, PAGE_2};
    use crate::types::MissingFieldPolicy;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app(transport: MockTransport) -> Router {
        router(AppState::new(Pipeline::new(transport), PAGE_1))
    }

    #[tokio::test]
    async fn test_healthcheck() {
        let (status, body) = get_json(app(MockTransport::new()), "/healthcheck").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn test_healthcheck_does_not_touch_upstream() {
        let transport = Arc::new(three_page_transport());
        let state = AppState::new(Pipeline::new(Arc::clone(&transport)), PAGE_1);

        let (status, _) = get_json(router(state), "/healthcheck").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_returns_matches_in_order() {
        let (status, body) = get_json(app(three_page_transport()), "/fetch").await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Rick Sanchez", "Summer Smith", "Beth Smith"]);
        assert_eq!(body[0]["location"], "Citadel of Ricks");
        assert!(body[0].get("species").is_none());
    }

    #[tokio::test]
    async fn test_fetch_empty_result_is_empty_array() {
        let transport = MockTransport::new().with_page(
            PAGE_1,
            page(
                vec![character("Birdperson", "Alien", "Dead", "Bird World", "x")],
                None,
            ),
        );
        let (status, body) = get_json(app(transport), "/fetch").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_fetch_upstream_failure_is_bad_gateway() {
        let transport = MockTransport::new()
            .with_page(PAGE_1, page(vec![], Some(PAGE_2)))
            .with_status(PAGE_2, 500);

        let (status, body) = get_json(app(transport), "/fetch").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["kind"], "fetch");
        assert!(body["error"]["message"].as_str().unwrap().contains(PAGE_2));
    }

    #[tokio::test]
    async fn test_fetch_deadline_is_gateway_timeout() {
        let transport = MockTransport::new()
            .with_delayed_page(PAGE_1, page(vec![], Some(PAGE_2)), Duration::from_millis(30))
            .with_page(PAGE_2, page(vec![], None));
        let pipeline = Pipeline::new(transport)
            .with_limits(FetchLimits::default().with_max_duration(Duration::from_millis(5)));

        let (status, body) = get_json(router(AppState::new(pipeline, PAGE_1)), "/fetch").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"]["kind"], "deadline_exceeded");
    }

    #[tokio::test]
    async fn test_fetch_after_shutdown_is_unavailable() {
        let state = AppState::new(Pipeline::new(three_page_transport()), PAGE_1);
        state.shutdown_token().cancel();

        let (status, body) = get_json(router(state), "/fetch").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["kind"], "cancelled");
    }

    #[tokio::test]
    async fn test_fetch_missing_field_with_fail_policy() {
        let transport = MockTransport::new().with_page(
            PAGE_1,
            page(vec![json!({"name": "Nobody", "status": "Alive"})], None),
        );
        let pipeline = Pipeline::new(transport).with_policy(MissingFieldPolicy::Fail);

        let (status, body) = get_json(router(AppState::new(pipeline, PAGE_1)), "/fetch").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["kind"], "projection");
    }

    #[tokio::test]
    async fn test_repeated_fetches_are_identical() {
        let app = app(three_page_transport());
        let (_, first) = get_json(app.clone(), "/fetch").await;
        let (_, second) = get_json(app, "/fetch").await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_status_mapping() {
        let fetch = |e| Error::fetch(PAGE_1, e);
        assert_eq!(status_for(&Error::Cancelled), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_for(&fetch(Error::Timeout { timeout_ms: 10 })),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&Error::DeadlineExceeded { limit_ms: 10 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&fetch(Error::http_status(500, "boom"))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::PageLimitExceeded { max_pages: 1 }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::output("disk full")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
