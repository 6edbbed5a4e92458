//! Event Dispatch
//!
//! Classifies each inbound event and produces a reply, an audit record, or
//! nothing. Events in one batch are processed concurrently; results keep the
//! input order and one event's failure never touches its siblings.

use std::sync::Arc;

use qb_line::{LineError, MessageContent, MessageEvent, MessagingApi, ReplyResponse, WebhookEvent};
use tracing::{error, warn};

use crate::audit::{AuditSink, LogRecord};
use crate::config::Config;

use super::matcher::match_command;
use super::memo::{BotIdentityCache, DisplayNameResolver};
use super::replies::compose;
use super::types::{ReplyIntent, ReplyUrls};

/// Follow-event audit message.
const FOLLOW_LOG: &str = "ติดตาม (Add Friend)";
/// Unfollow-event audit message.
const UNFOLLOW_LOG: &str = "เลิกติดตาม (Block/Unfriend)";
/// Join-event audit message.
const JOIN_LOG: &str = "บอทถูกเชิญเข้าห้อง/กลุ่ม";

/// Event dispatcher: fans a webhook batch out to per-event handlers.
///
/// Cheap to clone. The bot identity cache is shared by all clones, so the
/// identity is fetched at most once per process.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn MessagingApi>,
    audit: Arc<dyn AuditSink>,
    urls: Arc<ReplyUrls>,
    bot_identity: Arc<BotIdentityCache>,
}

impl Dispatcher {
    /// Create a dispatcher from the server configuration.
    #[must_use]
    pub fn new(client: Arc<dyn MessagingApi>, audit: Arc<dyn AuditSink>, config: &Config) -> Self {
        Self {
            client,
            audit,
            urls: Arc::new(ReplyUrls {
                booking: config.booking_url.clone(),
                history: config.history_url.clone(),
                faq: config.faq_url.clone(),
            }),
            bot_identity: Arc::new(BotIdentityCache::new()),
        }
    }

    /// Process a whole webhook batch concurrently.
    ///
    /// One task per event, joined in input order. A task that fails or
    /// panics is reported and yields `None` for its slot only.
    pub async fn process_batch(&self, events: Vec<WebhookEvent>) -> Vec<Option<ReplyResponse>> {
        let handles: Vec<_> = events
            .into_iter()
            .map(|event| {
                let dispatcher = self.clone();
                tokio::spawn(async move { dispatcher.handle_event(event).await })
            })
            .collect();

        futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(Ok(reply)) => reply,
                Ok(Err(e)) => {
                    error!(error = %e, "event handling failed");
                    None
                }
                Err(e) => {
                    error!(error = %e, "event handler panicked");
                    None
                }
            })
            .collect()
    }

    /// Handle one event. Lifecycle events only leave an audit record; only
    /// text and sticker messages with a reply token produce a reply.
    async fn handle_event(&self, event: WebhookEvent) -> Result<Option<ReplyResponse>, LineError> {
        match event {
            WebhookEvent::Follow(ev) => {
                self.record(ev.source.user_id(), FOLLOW_LOG).await;
                Ok(None)
            }
            WebhookEvent::Unfollow(ev) => {
                self.record(ev.source.user_id(), UNFOLLOW_LOG).await;
                Ok(None)
            }
            WebhookEvent::Join(ev) => {
                self.record(ev.source.label(), JOIN_LOG).await;
                Ok(None)
            }
            WebhookEvent::Message(ev) => self.handle_message(ev).await,
            WebhookEvent::Other => Ok(None),
        }
    }

    async fn handle_message(
        &self,
        event: MessageEvent,
    ) -> Result<Option<ReplyResponse>, LineError> {
        let reply_token = match event.reply_token.as_deref() {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };

        let (text, mention) = match event.message {
            MessageContent::Sticker {
                package_id,
                sticker_id,
            } => {
                let intent = ReplyIntent::EchoSticker {
                    package_id,
                    sticker_id,
                };
                let reply = self.client.reply(reply_token, compose(&intent, "")).await?;
                return Ok(Some(reply));
            }
            MessageContent::Text { text, mention } => (text, mention),
            MessageContent::Other => return Ok(None),
        };

        let mentionees = mention.map(|m| m.mentionees).unwrap_or_default();
        let bot_user_id = self.bot_identity.get(self.client.as_ref()).await;
        let user_id = event.source.user_id();

        let intent = match_command(&text, &mentionees, &bot_user_id, user_id, &self.urls);

        match &intent {
            ReplyIntent::MentionAck => {
                self.record(event.source.label(), format!("mention:{text}"))
                    .await;
            }
            ReplyIntent::Fallback { text } => {
                self.record(event.source.label(), text.clone()).await;
            }
            _ => {}
        }

        let display_name = match &intent {
            ReplyIntent::Booking { .. } | ReplyIntent::History { .. } => {
                DisplayNameResolver::new(self.client.as_ref(), &event.source)
                    .get()
                    .await
            }
            _ => String::new(),
        };

        let reply = self
            .client
            .reply(reply_token, compose(&intent, &display_name))
            .await?;
        Ok(Some(reply))
    }

    /// Append an audit record, reporting but swallowing failures.
    async fn record(&self, line_id: impl Into<String>, message: impl Into<String>) {
        let record = LogRecord::new(line_id, message);
        if let Err(e) = self.audit.append(record).await {
            warn!(error = %e, "failed to persist audit log");
        }
    }
}
