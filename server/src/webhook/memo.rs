//! Lookup Memoization
//!
//! Two caches with different lifetimes: the bot's own identity lives for the
//! whole process and is fetched at most once; the sender's display name
//! lives for one event's processing and is never shared across events.

use qb_line::{EventSource, MessagingApi};
use tokio::sync::OnceCell;
use tracing::warn;

/// Process-wide bot identity.
///
/// `get_or_init` gives single-flight semantics under concurrent first use. A
/// failed fetch is cached as the empty string so the upstream is not hit
/// again per event; a later bot rename is not reflected until restart.
#[derive(Debug, Default)]
pub struct BotIdentityCache {
    cell: OnceCell<String>,
}

impl BotIdentityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bot's user id, or `""` when the lookup failed.
    pub async fn get(&self, client: &dyn MessagingApi) -> String {
        self.cell
            .get_or_init(|| async {
                match client.bot_user_id().await {
                    Ok(id) => id,
                    Err(e) => {
                        warn!(error = %e, "bot identity lookup failed, mention detection disabled");
                        String::new()
                    }
                }
            })
            .await
            .clone()
    }
}

/// Sender display name, memoized for one event's processing.
///
/// Picks the group/room/user profile endpoint from the event source. Created
/// fresh per event invocation and passed down the call chain explicitly.
pub struct DisplayNameResolver<'a> {
    client: &'a dyn MessagingApi,
    source: &'a EventSource,
    cell: OnceCell<String>,
}

impl<'a> DisplayNameResolver<'a> {
    #[must_use]
    pub fn new(client: &'a dyn MessagingApi, source: &'a EventSource) -> Self {
        Self {
            client,
            source,
            cell: OnceCell::new(),
        }
    }

    /// Resolve the display name, fetching at most once. Failures and events
    /// without a sender id resolve to `""` without aborting the reply.
    pub async fn get(&self) -> String {
        let user_id = self.source.user_id();
        if user_id.is_empty() {
            return String::new();
        }
        self.cell
            .get_or_init(|| async {
                let fetched = match self.source {
                    EventSource::Group {
                        group_id: Some(group_id),
                        ..
                    } => self.client.group_member_profile(group_id, user_id).await,
                    EventSource::Room {
                        room_id: Some(room_id),
                        ..
                    } => self.client.room_member_profile(room_id, user_id).await,
                    _ => self.client.user_profile(user_id).await,
                };
                match fetched {
                    Ok(profile) => profile.display_name,
                    Err(e) => {
                        warn!(error = %e, "profile lookup failed");
                        String::new()
                    }
                }
            })
            .await
            .clone()
    }
}
