//! LINE Messaging API Surface
//!
//! Everything the webhook server needs from the platform side: the serde
//! model for inbound webhook events, request signature verification, and a
//! thin client for the handful of Messaging API endpoints the bot consumes.

pub mod client;
pub mod error;
pub mod events;
pub mod signature;

pub use client::{LineClient, MessagingApi, Profile, ReplyResponse, SentMessage, DEFAULT_API_BASE};
pub use error::LineError;
pub use events::{
    EventSource, LifecycleEvent, Mention, Mentionee, MessageContent, MessageEvent, WebhookEvent,
    WebhookRequest,
};
