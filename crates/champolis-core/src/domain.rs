use std::fmt;

/// Discord user id (snowflake).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// Discord guild id (snowflake).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GuildId(pub u64);

/// Discord role id (snowflake).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoleId(pub u64);

/// Discord channel id (snowflake). Threads are channels too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

/// Discord message id (snowflake).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// A forum thread handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThreadId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of channel a resolved id turned out to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Forum,
    Other,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChannelKind::Text => "text channel",
            ChannelKind::Forum => "forum channel",
            ChannelKind::Other => "other channel",
        };
        f.write_str(s)
    }
}

/// A live channel handle, resolved once per sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub kind: ChannelKind,
}

/// A stable reference to a Discord message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// An attachment as reported by the platform; bytes are fetched on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentRef {
    pub filename: String,
    pub content_type: Option<String>,
    pub url: String,
}

impl AttachmentRef {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.starts_with("image"))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionTally {
    pub emoji: String,
    pub count: u64,
}

/// The fields of a source-channel message the sync routine reads.
#[derive(Clone, Debug)]
pub struct SourceMessage {
    pub reference: MessageRef,
    pub author: UserId,
    pub content: String,
    pub attachments: Vec<AttachmentRef>,
    pub reactions: Vec<ReactionTally>,
    /// Permanent jump link to the message.
    pub link: String,
    pub pinned: bool,
}

impl SourceMessage {
    /// Count of `emoji` reactions; 0 when nobody reacted with it.
    pub fn reaction_count(&self, emoji: &str) -> u64 {
        self.reactions
            .iter()
            .find(|r| r.emoji == emoji)
            .map(|r| r.count)
            .unwrap_or(0)
    }
}

/// Title/body pulled out of a message. An empty title means "not a post".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedPost {
    pub title: String,
    pub body: String,
}

impl ExtractedPost {
    pub fn is_post(&self) -> bool {
        !self.title.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForumAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A forum thread to create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewThread {
    pub title: String,
    pub content: String,
    pub attachments: Vec<ForumAttachment>,
}

impl NewThread {
    /// Thread body: the post body, a blank line, then the back-link.
    pub fn from_post(post: &ExtractedPost, link: &str, attachments: Vec<ForumAttachment>) -> Self {
        let content = if post.body.is_empty() {
            link.to_string()
        } else {
            format!("{}\n\n{}", post.body, link)
        };
        Self {
            title: post.title.clone(),
            content,
            attachments,
        }
    }
}
