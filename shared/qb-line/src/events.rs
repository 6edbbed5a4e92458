//! Webhook Event Model
//!
//! Serde types for the LINE webhook payload. Event, source, and message
//! unions are internally tagged by `type`; anything the bot does not handle
//! deserializes to an `Other` variant so one unrecognized event cannot fail
//! the whole batch.

use serde::Deserialize;

/// Top-level webhook request body: `{ "destination": ..., "events": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRequest {
    /// Bot user id the webhook was sent to.
    #[serde(default)]
    pub destination: Option<String>,
    /// Ordered batch of platform events.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One platform event, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    /// A user added the bot as a friend.
    Follow(LifecycleEvent),
    /// A user blocked or removed the bot.
    Unfollow(LifecycleEvent),
    /// The bot was invited into a group or room.
    Join(LifecycleEvent),
    /// An inbound message; the only event kind that can be replied to.
    Message(MessageEvent),
    /// Any event type the bot does not handle (leave, postback, ...).
    #[serde(other)]
    Other,
}

/// Lifecycle event payload: only the source matters to the bot.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleEvent {
    pub source: EventSource,
}

/// Message event payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub source: EventSource,
    /// Single-use credential for replying; absent means no reply is possible.
    #[serde(default)]
    pub reply_token: Option<String>,
    pub message: MessageContent,
}

/// The conversational context an event originates from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSource {
    #[serde(rename_all = "camelCase")]
    User {
        #[serde(default)]
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Group {
        #[serde(default)]
        group_id: Option<String>,
        #[serde(default)]
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Room {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        user_id: Option<String>,
    },
}

impl EventSource {
    /// Stable label identifying the conversation: `user:<id>`, `group:<id>`,
    /// or `room:<id>`. Empty id when the platform omitted it.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::User { user_id } => format!("user:{}", user_id.as_deref().unwrap_or("")),
            Self::Group { group_id, .. } => {
                format!("group:{}", group_id.as_deref().unwrap_or(""))
            }
            Self::Room { room_id, .. } => format!("room:{}", room_id.as_deref().unwrap_or("")),
        }
    }

    /// The sending user's id, or `""` when the platform omitted it.
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::User { user_id }
            | Self::Group { user_id, .. }
            | Self::Room { user_id, .. } => user_id.as_deref().unwrap_or(""),
        }
    }
}

/// Message content, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        #[serde(default)]
        mention: Option<Mention>,
    },
    #[serde(rename_all = "camelCase")]
    Sticker {
        package_id: String,
        sticker_id: String,
    },
    /// Image, video, audio, file, location... none of which the bot answers.
    #[serde(other)]
    Other,
}

/// Mention block attached to a text message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mention {
    #[serde(default)]
    pub mentionees: Vec<Mentionee>,
}

/// One participant tagged in a text message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentionee {
    /// Absent for `@All` style mentions.
    #[serde(default)]
    pub user_id: Option<String>,
}
