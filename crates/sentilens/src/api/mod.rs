pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod wrapper;
pub mod ws;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::realtime::RealtimeHub;
use crate::service::AnalysisService;

/// 根据配置的前端地址构建跨域策略，`*` 表示允许任意来源
pub fn build_cors(origin: &str) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origin.trim() == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("无效的跨域来源: {}", origin))?;
    Ok(cors.allow_origin(origin))
}

pub fn router(service: Arc<AnalysisService>, hub: RealtimeHub, cors: CorsLayer) -> Router {
    // 同时保留旧版 /api/analyze 路径
    Router::new()
        .route("/", get(handler::root))
        .route("/api/analyses", get(handler::list_analyses).post(handler::analyze))
        .route("/api/analyze", get(handler::list_analyses).post(handler::analyze))
        .route("/api/dashboard/summary", get(handler::get_dashboard_summary))
        .route("/api/dashboard/posts", get(handler::get_dashboard_posts))
        .route("/api/ws", get(ws::ws_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", handler::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(Extension(service))
                .layer(Extension(hub)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::{lexicon_scorer, FailingPublisher, UnavailableRepository};
    use crate::store::tests::memory_repository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> (Router, Arc<AnalysisService>, RealtimeHub) {
        let repository = Arc::new(memory_repository().await);
        let hub = RealtimeHub::new(16);
        let service = Arc::new(AnalysisService::new(
            lexicon_scorer(),
            repository,
            Arc::new(hub.clone()),
            "Web".to_string(),
        ));
        let app = router(service.clone(), hub.clone(), build_cors("*").unwrap());
        (app, service, hub)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_returns_scoring_result() {
        let (app, _, _) = test_app().await;

        let (status, body) = send(&app, post_json("/api/analyses", r#"{"text": "What a wonderful day"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sentiment"], "Positive");
        assert_eq!(body["keywords"], json!(["wonderful"]));
        assert_eq!(body["emotion"], "Neutral");
        assert_eq!(body["sarcasm"], false);
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.5..=0.99).contains(&confidence));
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_text() {
        let (app, service, _) = test_app().await;

        for body in [r#"{"text": ""}"#, r#"{}"#] {
            let (status, body) = send(&app, post_json("/api/analyses", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["msg"], "Please provide text to analyze");
        }

        let (status, body) = send(&app, post_json("/api/analyze", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["msg"].is_string());

        assert_eq!(service.repository().count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let service = Arc::new(AnalysisService::new(
            lexicon_scorer(),
            Arc::new(UnavailableRepository),
            Arc::new(FailingPublisher::default()),
            "Web".to_string(),
        ));
        let app = router(service, RealtimeHub::new(4), build_cors("*").unwrap());

        let (status, body) = send(&app, post_json("/api/analyses", r#"{"text": "good"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["msg"], "Database Connection Error. Please check server logs.");

        let (status, body) = send(&app, get_uri("/api/dashboard/summary")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["msg"], "Server Error");
    }

    #[tokio::test]
    async fn test_scoring_failure_reports_error_detail() {
        use crate::sentiment::scorer::tests::BrokenScorer;
        use crate::sentiment::SentimentScorer;

        let service = Arc::new(AnalysisService::new(
            SentimentScorer::new(Arc::new(BrokenScorer)),
            Arc::new(memory_repository().await),
            Arc::new(FailingPublisher::default()),
            "Web".to_string(),
        ));
        let app = router(service.clone(), RealtimeHub::new(4), build_cors("*").unwrap());

        let (status, body) = send(&app, post_json("/api/analyses", r#"{"text": "good"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"msg": "Server Error during analysis", "error": "lexicon unavailable"})
        );
        assert_eq!(service.repository().count(None).await.unwrap(), 0);

        // 其他错误只返回 msg
        let (_, body) = send(&app, post_json("/api/analyses", r#"{"text": ""}"#)).await;
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_history_and_dashboard_endpoints() {
        let (app, _, _) = test_app().await;
        for text in ["I love it", "great stuff", "this is awful", "the meeting is at noon"] {
            let (status, _) = send(&app, post_json("/api/analyses", &format!(r#"{{"text": "{text}"}}"#))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, history) = send(&app, get_uri("/api/analyses?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0]["_id"].as_i64().unwrap() > history[1]["_id"].as_i64().unwrap());
        assert!(history[0].get("createdAt").is_some());

        let (status, summary) = send(&app, get_uri("/api/dashboard/summary")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            summary,
            json!({
                "totalPosts": 4,
                "overallSentiment": {"positive": 50, "neutral": 25, "negative": 25},
                "engagement": "N/A",
                "trend": "N/A"
            })
        );

        let (status, posts) = send(&app, get_uri("/api/dashboard/posts")).await;
        assert_eq!(status, StatusCode::OK);
        let posts = posts.as_array().unwrap();
        assert_eq!(posts.len(), 4);
        assert_eq!(posts[0]["text"], "the meeting is at noon");
        assert_eq!(posts[0]["platform"], "Web");
        assert!(posts[0]["date"].as_str().unwrap().ends_with("seconds ago"));

        let (status, _) = send(&app, get_uri("/api/dashboard/posts?limit=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_root_and_openapi() {
        let (app, _, _) = test_app().await;

        let response = app.clone().oneshot(get_uri("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).starts_with("Sentiment Analysis API Running"));

        let (status, doc) = send(&app, get_uri("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"].get("/api/analyses").is_some());
        assert!(doc["paths"].get("/api/dashboard/summary").is_some());
    }

    #[test]
    fn test_build_cors_rejects_invalid_origin() {
        assert!(build_cors("http://localhost:5173").is_ok());
        assert!(build_cors("*").is_ok());
        assert!(build_cors("bad\norigin").is_err());
    }

    #[tokio::test]
    async fn test_websocket_receives_new_analysis() {
        use futures::StreamExt;
        use tokio_tungstenite::tungstenite::Message;

        let (app, service, hub) = test_app().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/api/ws", addr))
            .await
            .unwrap();
        assert_eq!(hub.subscriber_count(), 1);

        let analyzed = service.analyze(Some("superb work"), Some("Twitter")).await.unwrap();

        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let Message::Text(text) = message else {
            panic!("unexpected message: {message:?}");
        };
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["event"], "new_analysis");
        assert_eq!(value["data"]["id"], analyzed.id);
        assert_eq!(value["data"]["sentiment"], "Positive");
        assert_eq!(value["data"]["platform"], "Twitter");
        assert_eq!(value["data"]["date"], "Just now");

        hub.shutdown();
        let closing = tokio::time::timeout(Duration::from_secs(5), socket.next()).await.unwrap();
        assert!(matches!(closing, Some(Ok(Message::Close(_))) | None));
    }
}
