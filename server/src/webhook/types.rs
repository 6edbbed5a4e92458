//! Webhook Types
//!
//! Reply intents and webhook-level errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// The decided category of response for one inbound message, before it is
/// rendered into concrete payloads. Every text message with a reply token
/// resolves to exactly one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyIntent {
    /// Nothing to send back.
    NoReply,
    /// Echo the sender's sticker back at them.
    EchoSticker {
        package_id: String,
        sticker_id: String,
    },
    /// Acknowledge that the bot was tagged.
    MentionAck,
    /// New Year greeting card for an exact "hi".
    Greeting,
    /// Queue-booking card linking to `url`.
    Booking { url: String },
    /// Booking-history card linking to `url`.
    History { url: String },
    /// FAQ buttons template linking to `url`.
    Faq { url: String },
    /// Static clinic location message.
    Location,
    /// Catch-all acknowledgment; carries the unmatched text for logging.
    Fallback { text: String },
}

/// Destination base URLs the matcher builds reply links from.
#[derive(Debug, Clone)]
pub struct ReplyUrls {
    pub booking: String,
    pub history: String,
    pub faq: String,
}

/// Webhook intake errors.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header missing or not matching the raw body.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// Request body was not a well-formed webhook payload.
    #[error("malformed webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidSignature => (StatusCode::UNAUTHORIZED, "invalid signature"),
            Self::Payload(e) => {
                tracing::error!(error = %e, "failed to parse webhook payload");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
