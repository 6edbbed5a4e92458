//! Test doubles and event builders for the webhook engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qb_line::{LineError, MessagingApi, Profile, ReplyResponse, SentMessage, WebhookEvent};
use serde_json::{json, Value};

use crate::audit::{AuditSink, LogRecord};
use crate::config::Config;
use crate::webhook::Dispatcher;

/// In-memory Messaging API recording every call.
#[derive(Default)]
pub struct FakeLine {
    pub bot_user_id: String,
    pub display_name: String,
    pub fail_bot_lookup: bool,
    pub fail_profile_lookup: bool,
    /// Reply tokens whose delivery should fail.
    pub fail_reply_tokens: Vec<String>,
    /// Artificial latency for the bot-info call, to widen single-flight races.
    pub bot_lookup_delay: Option<Duration>,
    pub bot_info_calls: AtomicUsize,
    /// Any profile endpoint.
    pub profile_calls: AtomicUsize,
    pub group_profile_calls: AtomicUsize,
    pub room_profile_calls: AtomicUsize,
    pub replies: Mutex<Vec<(String, Vec<Value>)>>,
}

impl FakeLine {
    pub fn with_bot_id(id: &str) -> Self {
        Self {
            bot_user_id: id.to_string(),
            ..Self::default()
        }
    }

    /// Replies delivered so far, as (reply token, messages) pairs.
    pub fn sent(&self) -> Vec<(String, Vec<Value>)> {
        self.replies.lock().unwrap().clone()
    }

    fn profile_result(&self) -> Result<Profile, LineError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile_lookup {
            return Err(upstream_error());
        }
        Ok(Profile {
            display_name: self.display_name.clone(),
        })
    }
}

fn upstream_error() -> LineError {
    LineError::Api {
        status: 500,
        body: "upstream unavailable".into(),
    }
}

#[async_trait]
impl MessagingApi for FakeLine {
    async fn bot_user_id(&self) -> Result<String, LineError> {
        self.bot_info_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.bot_lookup_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_bot_lookup {
            return Err(upstream_error());
        }
        Ok(self.bot_user_id.clone())
    }

    async fn user_profile(&self, _user_id: &str) -> Result<Profile, LineError> {
        self.profile_result()
    }

    async fn group_member_profile(
        &self,
        _group_id: &str,
        _user_id: &str,
    ) -> Result<Profile, LineError> {
        self.group_profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile_result()
    }

    async fn room_member_profile(
        &self,
        _room_id: &str,
        _user_id: &str,
    ) -> Result<Profile, LineError> {
        self.room_profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile_result()
    }

    async fn reply(
        &self,
        reply_token: &str,
        messages: Vec<Value>,
    ) -> Result<ReplyResponse, LineError> {
        if self.fail_reply_tokens.iter().any(|t| t == reply_token) {
            return Err(upstream_error());
        }
        self.replies
            .lock()
            .unwrap()
            .push((reply_token.to_string(), messages));
        Ok(ReplyResponse {
            sent_messages: vec![SentMessage {
                id: "m1".into(),
                quote_token: None,
            }],
        })
    }
}

/// In-memory audit sink.
#[derive(Default)]
pub struct MemorySink {
    pub fail: bool,
    pub records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn entries(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    async fn append(&self, record: LogRecord) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("sink unavailable");
        }
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

/// Dispatcher wired to fakes and the test configuration (destination URLs
/// `https://x/b`, `https://x/h`, `https://x/f`).
pub fn test_dispatcher(line: Arc<FakeLine>, sink: Arc<MemorySink>) -> Dispatcher {
    let mut config = Config::default_for_test();
    config.booking_url = "https://x/b".into();
    config.history_url = "https://x/h".into();
    config.faq_url = "https://x/f".into();
    Dispatcher::new(line, sink, &config)
}

/// Build events through the wire format, so tests also cover deserialization.
fn event(value: Value) -> WebhookEvent {
    serde_json::from_value(value).unwrap()
}

pub fn follow_event(user_id: &str) -> WebhookEvent {
    event(json!({
        "type": "follow",
        "source": { "type": "user", "userId": user_id },
    }))
}

pub fn unfollow_event(user_id: &str) -> WebhookEvent {
    event(json!({
        "type": "unfollow",
        "source": { "type": "user", "userId": user_id },
    }))
}

pub fn join_event(group_id: &str) -> WebhookEvent {
    event(json!({
        "type": "join",
        "source": { "type": "group", "groupId": group_id },
    }))
}

pub fn text_event(user_id: &str, reply_token: &str, text: &str) -> WebhookEvent {
    event(json!({
        "type": "message",
        "source": { "type": "user", "userId": user_id },
        "replyToken": reply_token,
        "message": { "type": "text", "text": text },
    }))
}

pub fn text_event_with_mention(
    group_id: &str,
    user_id: &str,
    reply_token: &str,
    text: &str,
    mentioned_id: &str,
) -> WebhookEvent {
    event(json!({
        "type": "message",
        "source": { "type": "group", "groupId": group_id, "userId": user_id },
        "replyToken": reply_token,
        "message": {
            "type": "text",
            "text": text,
            "mention": { "mentionees": [{ "index": 0, "length": 4, "userId": mentioned_id }] },
        },
    }))
}

pub fn sticker_event(
    user_id: &str,
    reply_token: &str,
    package_id: &str,
    sticker_id: &str,
) -> WebhookEvent {
    event(json!({
        "type": "message",
        "source": { "type": "user", "userId": user_id },
        "replyToken": reply_token,
        "message": { "type": "sticker", "packageId": package_id, "stickerId": sticker_id },
    }))
}
