//! Webhook HTTP Handlers
//!
//! Raw-body intake, signature verification, and batch processing.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use qb_line::{signature, ReplyResponse, WebhookRequest};
use serde::Serialize;
use tracing::{info, instrument};

use super::types::WebhookError;
use crate::api::AppState;

/// Signature header set by the platform.
const SIGNATURE_HEADER: &str = "x-line-signature";

/// Per-event results, positionally aligned with the inbound batch.
#[derive(Debug, Serialize)]
pub struct WebhookResults {
    pub results: Vec<Option<ReplyResponse>>,
}

/// POST `/api/line/webhook`
///
/// Verifies the signature over the exact raw body bytes before anything is
/// parsed or logged, then fans the batch out to the dispatcher.
#[instrument(skip_all)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResults>, WebhookError> {
    let signature_header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if !signature::verify_signature(&state.config.channel_secret, &body, signature_header) {
        return Err(WebhookError::InvalidSignature);
    }

    let request: WebhookRequest = serde_json::from_slice(&body)?;
    info!(events = request.events.len(), "webhook batch accepted");

    let results = state.dispatcher.process_batch(request.events).await;
    Ok(Json(WebhookResults { results }))
}

/// GET `/api/line/webhook`: fixed status payload.
pub async fn webhook_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "LINE Webhook กำลังทำงาน" }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::{create_router, AppState};
    use crate::config::Config;
    use crate::webhook::testing::{FakeLine, MemorySink};

    fn test_state(line: Arc<FakeLine>, sink: Arc<MemorySink>) -> AppState {
        let mut config = Config::default_for_test();
        config.booking_url = "https://x/b".into();
        config.history_url = "https://x/h".into();
        config.faq_url = "https://x/f".into();
        AppState::new(config, line, sink)
    }

    fn webhook_post(body: &str, signature: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/line/webhook")
            .header("content-type", "application/json")
            .header("x-line-signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sign(body: &str) -> String {
        qb_line::signature::sign_payload(&Config::default_for_test().channel_secret, body.as_bytes())
    }

    #[tokio::test]
    async fn rejects_bad_signature_before_any_processing() {
        let line = Arc::new(FakeLine::with_bot_id("Ubot"));
        let sink = Arc::new(MemorySink::default());
        let app = create_router(test_state(line.clone(), sink.clone()));

        let body = json!({
            "events": [
                { "type": "follow", "source": { "type": "user", "userId": "U1" } },
                {
                    "type": "message",
                    "source": { "type": "user", "userId": "U1" },
                    "replyToken": "T1",
                    "message": { "type": "text", "text": "จองคิว" },
                },
            ]
        })
        .to_string();

        let response = app
            .oneshot(webhook_post(&body, "bad-signature"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert!(json["error"].is_string());
        // Nothing was logged and nothing was sent.
        assert!(sink.entries().is_empty());
        assert!(line.sent().is_empty());
    }

    #[tokio::test]
    async fn processes_a_signed_batch_and_aligns_results() {
        let line = Arc::new(FakeLine::with_bot_id("Ubot"));
        let sink = Arc::new(MemorySink::default());
        let app = create_router(test_state(line.clone(), sink.clone()));

        let body = json!({
            "events": [
                { "type": "follow", "source": { "type": "user", "userId": "U1" } },
                {
                    "type": "message",
                    "source": { "type": "user", "userId": "U1" },
                    "replyToken": "T1",
                    "message": { "type": "text", "text": "จองคิว" },
                },
            ]
        })
        .to_string();

        let response = app.oneshot(webhook_post(&body, &sign(&body))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_null());
        assert!(results[1]["sentMessages"].is_array());

        let sent = line.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].1[0]["contents"]["footer"]["contents"][0]["action"]["uri"],
            "https://x/b?userid=U1"
        );
    }

    #[tokio::test]
    async fn malformed_body_with_valid_signature_is_a_server_error() {
        let line = Arc::new(FakeLine::with_bot_id("Ubot"));
        let sink = Arc::new(MemorySink::default());
        let app = create_router(test_state(line, sink));

        let body = "not json";
        let response = app.oneshot(webhook_post(body, &sign(body))).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "internal server error");
    }

    #[tokio::test]
    async fn webhook_status_and_health_endpoints_answer() {
        let line = Arc::new(FakeLine::with_bot_id("Ubot"));
        let sink = Arc::new(MemorySink::default());
        let app = create_router(test_state(line, sink));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/line/webhook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "LINE Webhook กำลังทำงาน");

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
    }
}
