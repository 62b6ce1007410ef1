//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/sessions", post(http::http_create_session))
        .route("/api/v1/sessions/:id", get(http::http_get_session))
        .route("/api/v1/sessions/:id/start", post(http::http_start_session))
        .route("/api/v1/sessions/:id/submit", post(http::http_submit))
        .route("/api/v1/sessions/:id/skip", post(http::http_skip))
        .route("/api/v1/sessions/:id/next", post(http::http_next))
        .route("/api/v1/sessions/:id/correct", post(http::http_correct))
        .route("/api/v1/sessions/:id/restart", post(http::http_restart))
        .route("/api/v1/grade", post(http::http_grade))
        .route("/api/v1/shared/:character", get(http::http_shared_words))
        .route("/api/v1/shared_options", get(http::http_shared_options))
        .route("/api/v1/pinyin", post(http::http_post_pinyin))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::seeds::seed_vocab;

    fn app() -> Router {
        let state = AppState::from_parts(&AppConfig::default(), seed_vocab()).unwrap();
        build_router(Arc::new(state))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["n_records"], 12);
    }

    #[tokio::test]
    async fn test_full_game_over_http() {
        let app = app();
        let (status, created) = send(&app, "POST", "/api/v1/sessions", Some(json!({ "seed": 42 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["phase"], "not_started");
        let id = created["id"].as_str().unwrap().to_string();

        // the four combo words in the food category
        let start = json!({
            "gameplay": "easy",
            "filters": {
                "eligible_types": ["combo"],
                "eligible_categories": ["food"]
            }
        });
        let (status, s) = send(&app, "POST", &format!("/api/v1/sessions/{id}/start"), Some(start)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(s["deck_len"], 4);
        assert_eq!(s["phase"], "awaiting_answer");
        assert_eq!(s["prompt"]["components"].as_array().unwrap().len(), 2);

        let (_, s) = send(&app, "POST", &format!("/api/v1/sessions/{id}/submit"), Some(json!({ "guess": "qqqqqqqq" }))).await;
        assert_eq!(s["phase"], "submitted");
        assert_eq!(s["feedback"]["correct"], false);
        assert_eq!(s["score"]["streak"], 0);

        let (_, s) = send(&app, "POST", &format!("/api/v1/sessions/{id}/correct"), None).await;
        assert_eq!(s["score"]["n_correct"], 1);
        assert_eq!(s["score"]["streak"], 1);
        assert_eq!(s["feedback"]["correct"], true);

        for _ in 0..4 {
            send(&app, "POST", &format!("/api/v1/sessions/{id}/skip"), None).await;
        }
        let (_, s) = send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(s["phase"], "finished");
        assert_eq!(s["summary"]["message"], "No words remaining");
        assert_eq!(s["summary"]["final_score"]["n_guess"], 1);

        let (_, s) = send(&app, "POST", &format!("/api/v1/sessions/{id}/restart"), None).await;
        assert_eq!(s["phase"], "not_started");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (status, body) = send(&app(), "POST", "/api/v1/sessions/nope/next", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown_session");
    }

    #[tokio::test]
    async fn test_bad_gameplay_is_400() {
        let app = app();
        let (_, created) = send(&app, "POST", "/api/v1/sessions", None).await;
        let id = created["id"].as_str().unwrap().to_string();
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/start"),
            Some(json!({ "gameplay": "nightmare" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "configuration_error");
    }

    #[tokio::test]
    async fn test_grade_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/grade",
            Some(json!({ "guess": "insurance (protection)", "accepted": ["insurance"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["correct"], true);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/grade",
            Some(json!({ "guess": "x", "accepted": ["x"], "mode": "vibes" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_shared_words_endpoint() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/v1/shared/%E7%89%9B", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["character"], "牛");
        let forms: Vec<&str> = body["words"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["chinese"].as_str().unwrap())
            .collect();
        assert_eq!(forms, vec!["牛奶", "牛", "牛肉"]);

        let (_, body) = send(&app, "GET", "/api/v1/shared_options?min_words=3", None).await;
        let first = &body["options"][0];
        assert_eq!(first["character"], "油");
    }
}
