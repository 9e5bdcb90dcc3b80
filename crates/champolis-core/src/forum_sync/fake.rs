//! In-memory `ForumPlatform` used by the sync tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{domain::*, errors::Error, ports::ForumPlatform, Result};

#[derive(Default)]
struct State {
    channels: HashMap<ChannelId, ChannelKind>,
    messages: HashMap<ChannelId, Vec<SourceMessage>>,
    active: Vec<(ChannelId, ThreadId)>,
    archived: Vec<(ChannelId, ThreadId)>,
    next_thread: u64,

    created: Vec<(ChannelId, NewThread)>,
    /// Threads still present in the target forum at each create call.
    remaining_at_create: Vec<usize>,
    deleted: Vec<ThreadId>,
    reactions: Vec<(MessageRef, String)>,
    pins: Vec<MessageRef>,

    broken_channels: HashSet<ChannelId>,
    fail_create_titles: HashSet<String>,
    fail_delete: HashSet<ThreadId>,
    fail_download: HashSet<String>,
    fail_list: bool,
    fail_fetch: bool,
    fail_react: bool,
    fail_pin: bool,
}

#[derive(Default)]
pub(crate) struct FakePlatform {
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn with_channel(self, id: u64, kind: ChannelKind) -> Self {
        self.state.lock().unwrap().channels.insert(ChannelId(id), kind);
        self
    }

    /// Messages are stored newest first, like the Discord history endpoint.
    pub fn with_messages(self, channel: u64, msgs: Vec<SourceMessage>) -> Self {
        self.state
            .lock()
            .unwrap()
            .messages
            .insert(ChannelId(channel), msgs);
        self
    }

    pub fn with_active_threads(self, forum: u64, ids: &[u64]) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            for id in ids {
                s.active.push((ChannelId(forum), ThreadId(*id)));
            }
        }
        self
    }

    pub fn with_archived_threads(self, forum: u64, ids: &[u64]) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            for id in ids {
                s.archived.push((ChannelId(forum), ThreadId(*id)));
            }
        }
        self
    }

    pub fn broken_channel(self, id: u64) -> Self {
        self.state
            .lock()
            .unwrap()
            .broken_channels
            .insert(ChannelId(id));
        self
    }

    pub fn failing_create(self, title: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_create_titles
            .insert(title.to_string());
        self
    }

    pub fn failing_delete(self, id: u64) -> Self {
        self.state.lock().unwrap().fail_delete.insert(ThreadId(id));
        self
    }

    pub fn failing_download(self, url: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_download
            .insert(url.to_string());
        self
    }

    pub fn failing_list(self) -> Self {
        self.state.lock().unwrap().fail_list = true;
        self
    }

    pub fn failing_fetch(self) -> Self {
        self.state.lock().unwrap().fail_fetch = true;
        self
    }

    pub fn failing_react_and_pin(self) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            s.fail_react = true;
            s.fail_pin = true;
        }
        self
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .created
            .iter()
            .map(|(_, t)| t.title.clone())
            .collect()
    }

    pub fn created(&self) -> Vec<NewThread> {
        self.state
            .lock()
            .unwrap()
            .created
            .iter()
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn remaining_at_create(&self) -> Vec<usize> {
        self.state.lock().unwrap().remaining_at_create.clone()
    }

    pub fn deleted(&self) -> Vec<ThreadId> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn reactions(&self) -> Vec<(MessageRef, String)> {
        self.state.lock().unwrap().reactions.clone()
    }

    pub fn pins(&self) -> Vec<MessageRef> {
        self.state.lock().unwrap().pins.clone()
    }

    /// Active + archived threads currently in `forum`.
    pub fn thread_count(&self, forum: u64) -> usize {
        let s = self.state.lock().unwrap();
        count_in(&s, ChannelId(forum))
    }

    pub fn mutation_count(&self) -> usize {
        let s = self.state.lock().unwrap();
        s.created.len() + s.deleted.len() + s.reactions.len() + s.pins.len()
    }
}

fn count_in(s: &State, forum: ChannelId) -> usize {
    s.active
        .iter()
        .chain(s.archived.iter())
        .filter(|(f, _)| *f == forum)
        .count()
}

#[async_trait]
impl ForumPlatform for FakePlatform {
    async fn resolve_channel(&self, id: ChannelId) -> Result<Option<ChannelRef>> {
        let s = self.state.lock().unwrap();
        if s.broken_channels.contains(&id) {
            return Err(Error::Platform("503 Service Unavailable".to_string()));
        }
        Ok(s.channels.get(&id).map(|kind| ChannelRef { id, kind: *kind }))
    }

    async fn fetch_recent_messages(
        &self,
        channel: ChannelId,
        limit: u8,
    ) -> Result<Vec<SourceMessage>> {
        let s = self.state.lock().unwrap();
        if s.fail_fetch {
            return Err(Error::Platform("401 Unauthorized".to_string()));
        }
        Ok(s.messages
            .get(&channel)
            .map(|m| m.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn list_active_threads(&self, forum: ChannelId) -> Result<Vec<ThreadId>> {
        let s = self.state.lock().unwrap();
        if s.fail_list {
            return Err(Error::Platform("connection reset".to_string()));
        }
        Ok(s.active
            .iter()
            .filter(|(f, _)| *f == forum)
            .map(|(_, t)| *t)
            .collect())
    }

    async fn list_archived_threads(&self, forum: ChannelId) -> Result<Vec<ThreadId>> {
        let s = self.state.lock().unwrap();
        Ok(s.archived
            .iter()
            .filter(|(f, _)| *f == forum)
            .map(|(_, t)| *t)
            .collect())
    }

    async fn delete_thread(&self, thread: ThreadId) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail_delete.contains(&thread) {
            return Err(Error::Platform("Missing Permissions".to_string()));
        }
        s.active.retain(|(_, t)| *t != thread);
        s.archived.retain(|(_, t)| *t != thread);
        s.deleted.push(thread);
        Ok(())
    }

    async fn create_thread(&self, forum: ChannelId, thread: &NewThread) -> Result<ThreadId> {
        let mut s = self.state.lock().unwrap();
        let remaining = count_in(&s, forum);
        s.remaining_at_create.push(remaining);
        if s.fail_create_titles.contains(&thread.title) {
            return Err(Error::Platform("rate limited".to_string()));
        }
        s.next_thread += 1;
        let id = ThreadId(10_000 + s.next_thread);
        s.created.push((forum, thread.clone()));
        s.active.push((forum, id));
        Ok(id)
    }

    async fn download_attachment(&self, attachment: &AttachmentRef) -> Result<Vec<u8>> {
        let s = self.state.lock().unwrap();
        if s.fail_download.contains(&attachment.url) {
            return Err(Error::Platform("404 Not Found".to_string()));
        }
        Ok(attachment.url.as_bytes().to_vec())
    }

    async fn add_reaction(&self, msg: MessageRef, emoji: &str) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail_react {
            return Err(Error::Platform("Unknown Emoji".to_string()));
        }
        s.reactions.push((msg, emoji.to_string()));
        Ok(())
    }

    async fn pin_message(&self, msg: MessageRef) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail_pin {
            return Err(Error::Platform("Maximum number of pins reached".to_string()));
        }
        s.pins.push(msg);
        Ok(())
    }
}

/// A source message in channel `channel` with `checks` ✅ reactions.
pub(crate) fn message(channel: u64, id: u64, content: &str, checks: u64) -> SourceMessage {
    let reactions = if checks > 0 {
        vec![ReactionTally {
            emoji: "✅".to_string(),
            count: checks,
        }]
    } else {
        vec![]
    };
    SourceMessage {
        reference: MessageRef {
            channel_id: ChannelId(channel),
            message_id: MessageId(id),
        },
        author: UserId(1),
        content: content.to_string(),
        attachments: vec![],
        reactions,
        link: format!("https://discord.com/channels/1/{channel}/{id}"),
        pinned: false,
    }
}

pub(crate) fn image(name: &str) -> AttachmentRef {
    AttachmentRef {
        filename: name.to_string(),
        content_type: Some("image/png".to_string()),
        url: format!("https://cdn.example/{name}"),
    }
}
