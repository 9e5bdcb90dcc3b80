//! Discord adapter (serenity).
//!
//! This crate implements the `champolis-core` ForumPlatform over the Discord HTTP API
//! and runs the gateway client that routes commands into the core.

use std::sync::Arc;

use async_trait::async_trait;

use serenity::{
    builder::{CreateAttachment, CreateForumPost, CreateMessage, GetMessages},
    http::{Http, HttpError, LightMethod, Request, Route},
    model::{
        channel::{Channel, ChannelType, Message, ReactionType, ThreadsData},
        id::{ChannelId as DcChannelId, EmojiId, MessageId as DcMessageId},
    },
};
use tracing::warn;

pub mod handlers;
pub mod router;

use champolis_core::{
    domain::{
        AttachmentRef, ChannelId, ChannelKind, ChannelRef, MessageId, MessageRef, NewThread,
        ReactionTally, SourceMessage, ThreadId, UserId,
    },
    errors::Error,
    ports::ForumPlatform,
    Result,
};

const PIN_REASON: &str = "Synced by bot";

#[derive(Clone)]
pub struct DiscordPlatform {
    http: Arc<Http>,
    download: reqwest::Client,
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>, download: reqwest::Client) -> Self {
        Self { http, download }
    }

    fn dc_channel(id: ChannelId) -> DcChannelId {
        DcChannelId::new(id.0)
    }

    fn dc_msg_id(id: MessageId) -> DcMessageId {
        DcMessageId::new(id.0)
    }

    fn map_err(e: serenity::Error) -> Error {
        Error::Platform(format!("discord error: {e}"))
    }

    async fn fetch_channel(&self, id: ChannelId) -> Result<Option<Channel>> {
        match Self::dc_channel(id).to_channel(&*self.http).await {
            Ok(ch) => Ok(Some(ch)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(Self::map_err(e)),
        }
    }

    /// One page of public archived threads, newest archive first.
    ///
    /// `before` is an ISO 8601 archive timestamp. serenity's typed helper only
    /// takes an integer cursor, so the request is built here.
    async fn archived_page(&self, forum: ChannelId, before: Option<&str>) -> Result<ThreadsData> {
        let req = Request::new(
            Route::ChannelArchivedPublicThreads {
                channel_id: Self::dc_channel(forum),
            },
            LightMethod::Get,
        )
        .params(before.map(|ts| vec![("before", ts.to_string())]));
        self.http.fire(req).await.map_err(Self::map_err)
    }
}

/// Cursor for the page after `page`: the archive timestamp of its last thread.
///
/// `None` once Discord reports no more pages, or when the last thread carries
/// no timestamp to continue from.
fn next_archive_cursor(page: &ThreadsData) -> Option<String> {
    if !page.has_more {
        return None;
    }
    page.threads
        .last()
        .and_then(|t| t.thread_metadata.as_ref())
        .and_then(|m| m.archive_timestamp)
        .and_then(|ts| ts.to_rfc3339())
}

fn forum_post(thread: &NewThread) -> CreateForumPost<'static> {
    let message = CreateMessage::new()
        .content(thread.content.clone())
        .add_files(
            thread
                .attachments
                .iter()
                .map(|f| CreateAttachment::bytes(f.bytes.clone(), f.filename.clone())),
        );
    CreateForumPost::new(thread.title.clone(), message)
}

fn is_not_found(e: &serenity::Error) -> bool {
    matches!(
        e,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp))
            if resp.status_code.as_u16() == 404
    )
}

fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::Forum => ChannelKind::Forum,
        _ => ChannelKind::Other,
    }
}

/// Parse an emoji string into a serenity ReactionType.
///
/// `name:id` is a custom guild emoji; anything else is sent as unicode.
fn parse_reaction_type(emoji: &str) -> ReactionType {
    if let Some((name, id)) = emoji.rsplit_once(':') {
        // EmojiId::new panics on zero.
        if let Ok(id @ 1..) = id.parse::<u64>() {
            return ReactionType::Custom {
                animated: false,
                id: EmojiId::new(id),
                name: Some(name.to_string()),
            };
        }
    }
    ReactionType::Unicode(emoji.to_string())
}

fn reaction_name(reaction: &ReactionType) -> String {
    match reaction {
        ReactionType::Unicode(s) => s.clone(),
        other => other.to_string(),
    }
}

fn source_message(msg: &Message) -> SourceMessage {
    SourceMessage {
        reference: MessageRef {
            channel_id: ChannelId(msg.channel_id.get()),
            message_id: MessageId(msg.id.get()),
        },
        author: UserId(msg.author.id.get()),
        content: msg.content.clone(),
        attachments: msg
            .attachments
            .iter()
            .map(|a| AttachmentRef {
                filename: a.filename.clone(),
                content_type: a.content_type.clone(),
                url: a.url.clone(),
            })
            .collect(),
        reactions: msg
            .reactions
            .iter()
            .map(|r| ReactionTally {
                emoji: reaction_name(&r.reaction_type),
                count: r.count,
            })
            .collect(),
        link: msg.link(),
        pinned: msg.pinned,
    }
}

#[async_trait]
impl ForumPlatform for DiscordPlatform {
    async fn resolve_channel(&self, id: ChannelId) -> Result<Option<ChannelRef>> {
        let kind = match self.fetch_channel(id).await? {
            None => return Ok(None),
            Some(Channel::Guild(gc)) => channel_kind(gc.kind),
            Some(_) => ChannelKind::Other,
        };
        Ok(Some(ChannelRef { id, kind }))
    }

    async fn fetch_recent_messages(
        &self,
        channel: ChannelId,
        limit: u8,
    ) -> Result<Vec<SourceMessage>> {
        let msgs = Self::dc_channel(channel)
            .messages(&*self.http, GetMessages::new().limit(limit))
            .await
            .map_err(Self::map_err)?;
        Ok(msgs.iter().map(source_message).collect())
    }

    async fn list_active_threads(&self, forum: ChannelId) -> Result<Vec<ThreadId>> {
        // Active threads are only listable per guild.
        let guild_id = match self.fetch_channel(forum).await? {
            Some(Channel::Guild(gc)) => gc.guild_id,
            _ => {
                return Err(Error::Platform(format!(
                    "forum {forum} is not a guild channel"
                )))
            }
        };

        let data = guild_id
            .get_active_threads(&*self.http)
            .await
            .map_err(Self::map_err)?;
        let parent = Self::dc_channel(forum);
        Ok(data
            .threads
            .iter()
            .filter(|t| t.parent_id == Some(parent))
            .map(|t| ThreadId(t.id.get()))
            .collect())
    }

    async fn list_archived_threads(&self, forum: ChannelId) -> Result<Vec<ThreadId>> {
        let mut out = Vec::new();
        let mut before: Option<String> = None;
        loop {
            let page = self.archived_page(forum, before.as_deref()).await?;
            out.extend(page.threads.iter().map(|t| ThreadId(t.id.get())));

            match next_archive_cursor(&page) {
                Some(cursor) => before = Some(cursor),
                None => {
                    if page.has_more {
                        warn!("Archived threads of {forum}: no cursor for the next page");
                    }
                    break;
                }
            }
        }
        Ok(out)
    }

    async fn delete_thread(&self, thread: ThreadId) -> Result<()> {
        DcChannelId::new(thread.0)
            .delete(&*self.http)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn create_thread(&self, forum: ChannelId, thread: &NewThread) -> Result<ThreadId> {
        let post = forum_post(thread);
        let created = Self::dc_channel(forum)
            .create_forum_post(&*self.http, post)
            .await
            .map_err(Self::map_err)?;
        Ok(ThreadId(created.id.get()))
    }

    async fn download_attachment(&self, attachment: &AttachmentRef) -> Result<Vec<u8>> {
        let resp = self
            .download
            .get(&attachment.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::External(format!("attachment download error: {e}")))?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::External(format!("attachment download error: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn add_reaction(&self, msg: MessageRef, emoji: &str) -> Result<()> {
        Self::dc_channel(msg.channel_id)
            .create_reaction(
                &*self.http,
                Self::dc_msg_id(msg.message_id),
                parse_reaction_type(emoji),
            )
            .await
            .map_err(Self::map_err)
    }

    async fn pin_message(&self, msg: MessageRef) -> Result<()> {
        self.http
            .pin_message(
                Self::dc_channel(msg.channel_id),
                Self::dc_msg_id(msg.message_id),
                Some(PIN_REASON),
            )
            .await
            .map_err(Self::map_err)
    }
}
