//! Messaging API Client
//!
//! Thin reqwest wrapper over the endpoints the bot consumes, behind the
//! [`MessagingApi`] trait so the dispatch engine can be driven by fakes in
//! tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LineError;

/// Production Messaging API origin.
pub const DEFAULT_API_BASE: &str = "https://api.line.me";

/// The Messaging API operations consumed by the webhook server.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// The bot's own user id.
    async fn bot_user_id(&self) -> Result<String, LineError>;

    /// Display profile of a user the bot talks to directly.
    async fn user_profile(&self, user_id: &str) -> Result<Profile, LineError>;

    /// Display profile of a group member.
    async fn group_member_profile(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Profile, LineError>;

    /// Display profile of a room member.
    async fn room_member_profile(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> Result<Profile, LineError>;

    /// Deliver reply messages for a reply token.
    async fn reply(
        &self,
        reply_token: &str,
        messages: Vec<serde_json::Value>,
    ) -> Result<ReplyResponse, LineError>;
}

/// Subset of a user profile the bot cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub display_name: String,
}

/// Response of the reply endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    #[serde(default)]
    pub sent_messages: Vec<SentMessage>,
}

/// One delivered reply message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BotInfo {
    #[serde(default)]
    user_id: String,
}

/// Reqwest-backed Messaging API client.
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    base: String,
    access_token: String,
}

impl LineClient {
    /// Create a client for the production API origin.
    #[must_use]
    pub fn new(access_token: String) -> Self {
        Self::with_base(DEFAULT_API_BASE.to_string(), access_token)
    }

    /// Create a client against a custom origin (tests, proxies).
    #[must_use]
    pub fn with_base(base: String, access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, LineError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, LineError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MessagingApi for LineClient {
    async fn bot_user_id(&self) -> Result<String, LineError> {
        let info: BotInfo = self.get_json("/v2/bot/info").await?;
        Ok(info.user_id)
    }

    async fn user_profile(&self, user_id: &str) -> Result<Profile, LineError> {
        self.get_json(&format!("/v2/bot/profile/{user_id}")).await
    }

    async fn group_member_profile(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Profile, LineError> {
        self.get_json(&format!("/v2/bot/group/{group_id}/member/{user_id}"))
            .await
    }

    async fn room_member_profile(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> Result<Profile, LineError> {
        self.get_json(&format!("/v2/bot/room/{room_id}/member/{user_id}"))
            .await
    }

    async fn reply(
        &self,
        reply_token: &str,
        messages: Vec<serde_json::Value>,
    ) -> Result<ReplyResponse, LineError> {
        let response = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.base))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({
                "replyToken": reply_token,
                "messages": messages,
            }))
            .send()
            .await?;
        Self::decode(response).await
    }
}
