use async_trait::async_trait;

use crate::{domain::*, Result};

/// Hexagonal port for the chat platform the sync routine drives.
///
/// Discord is the only implementation; tests use an in-memory fake. Each call is
/// attempted exactly once, retries are not part of the contract.
#[async_trait]
pub trait ForumPlatform: Send + Sync {
    /// Look up a channel by id. `Ok(None)` means it does not exist (or is not
    /// visible to the bot).
    async fn resolve_channel(&self, id: ChannelId) -> Result<Option<ChannelRef>>;

    /// Most recent `limit` messages of a text channel, newest first.
    async fn fetch_recent_messages(
        &self,
        channel: ChannelId,
        limit: u8,
    ) -> Result<Vec<SourceMessage>>;

    async fn list_active_threads(&self, forum: ChannelId) -> Result<Vec<ThreadId>>;

    /// Every archived thread of the forum; implementations page until exhausted.
    async fn list_archived_threads(&self, forum: ChannelId) -> Result<Vec<ThreadId>>;

    async fn delete_thread(&self, thread: ThreadId) -> Result<()>;

    async fn create_thread(&self, forum: ChannelId, thread: &NewThread) -> Result<ThreadId>;

    async fn download_attachment(&self, attachment: &AttachmentRef) -> Result<Vec<u8>>;

    async fn add_reaction(&self, msg: MessageRef, emoji: &str) -> Result<()>;

    async fn pin_message(&self, msg: MessageRef) -> Result<()>;
}
