//! Channel-to-forum sync.
//!
//! One run resolves the two channels, wipes the forum, then republishes the
//! ranked, titled messages of the source channel as fresh threads.

pub mod extract;
pub mod locks;
pub mod publisher;
pub mod reset;
pub mod resolver;
pub mod selector;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;

use tracing::{debug, error, info};

pub use extract::{extract_fields, has_title};
pub use locks::ForumLocks;
pub use selector::{SelectionRule, SortOrder};

use crate::{
    config::Config,
    domain::{ChannelId, NewThread},
    ports::ForumPlatform,
    Result,
};

/// A configured sync feature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncProfile {
    pub name: String,
    pub source_channel: ChannelId,
    pub forum_channel: ChannelId,
    pub rule: SelectionRule,
    /// Reaction added (and pin applied) to each source message once published.
    pub mark_published: Option<String>,
}

impl SyncProfile {
    /// Library → ranked books: every titled message, fewest votes first.
    pub fn library(cfg: &Config) -> Self {
        Self {
            name: "library".to_string(),
            source_channel: cfg.library_channel,
            forum_channel: cfg.library_forum,
            rule: SelectionRule {
                limit: cfg.message_fetch_limit,
                emoji: cfg.reaction_emoji.clone(),
                min_reactions: None,
                order: SortOrder::Ascending,
            },
            mark_published: None,
        }
    }

    /// Suggestions → priorities: voted messages only, most votes first.
    pub fn suggestions(cfg: &Config) -> Self {
        Self {
            name: "suggestions".to_string(),
            source_channel: cfg.suggestion_channel,
            forum_channel: cfg.priorities_forum,
            rule: SelectionRule {
                limit: cfg.message_fetch_limit,
                emoji: cfg.reaction_emoji.clone(),
                min_reactions: Some(cfg.min_reactions),
                order: SortOrder::Descending,
            },
            mark_published: Some(cfg.processed_mark.clone()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Resolving,
    Aborted,
    Resetting,
    Selecting,
    Publishing(usize),
    Done,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Idle => f.write_str("idle"),
            SyncPhase::Resolving => f.write_str("resolving"),
            SyncPhase::Aborted => f.write_str("aborted"),
            SyncPhase::Resetting => f.write_str("resetting"),
            SyncPhase::Selecting => f.write_str("selecting"),
            SyncPhase::Publishing(n) => write!(f, "publishing #{n}"),
            SyncPhase::Done => f.write_str("done"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub deleted: usize,
    pub delete_failed: usize,
    pub selected: usize,
    pub skipped: usize,
    pub published: usize,
    pub publish_failed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Channel validation failed; the forum was not touched.
    Aborted(Vec<String>),
    Completed(SyncReport),
}

struct PhaseTracker<'a> {
    profile: &'a str,
    phase: SyncPhase,
}

impl PhaseTracker<'_> {
    fn enter(&mut self, next: SyncPhase) {
        debug!("[{}] {} -> {}", self.profile, self.phase, next);
        self.phase = next;
    }
}

/// Run one full sync for `profile`.
///
/// Holds the forum's lock for the whole run. Errors from listing threads or
/// fetching history abort the run with `Err`; per-item failures are logged and
/// counted in the report.
pub async fn run_sync(
    platform: &dyn ForumPlatform,
    profile: &SyncProfile,
    locks: &ForumLocks,
) -> Result<SyncOutcome> {
    let _guard = locks.lock_forum(profile.forum_channel).await;
    let mut phase = PhaseTracker {
        profile: &profile.name,
        phase: SyncPhase::Idle,
    };

    phase.enter(SyncPhase::Resolving);
    let resolved = resolver::resolve_channels(
        platform,
        &profile.name,
        profile.source_channel,
        profile.forum_channel,
    )
    .await;
    let Some((source, forum)) = resolved.validated() else {
        for err in &resolved.errors {
            error!("{err}");
        }
        info!("[{}] Sync aborted: channels are missing.", profile.name);
        phase.enter(SyncPhase::Aborted);
        return Ok(SyncOutcome::Aborted(resolved.errors));
    };

    phase.enter(SyncPhase::Resetting);
    let reset = reset::clear_forum(platform, forum).await?;

    phase.enter(SyncPhase::Selecting);
    let messages = selector::select_messages(platform, source, &profile.rule).await?;

    let mut report = SyncReport {
        deleted: reset.deleted,
        delete_failed: reset.failed,
        selected: messages.len(),
        ..SyncReport::default()
    };

    for msg in &messages {
        let post = extract_fields(&msg.content);
        if !post.is_post() {
            report.skipped += 1;
            continue;
        }

        phase.enter(SyncPhase::Publishing(report.published + report.publish_failed));
        let images = publisher::collect_images(platform, msg).await;
        let thread = NewThread::from_post(&post, &msg.link, images);

        if !publisher::publish_thread(platform, forum, &thread).await {
            report.publish_failed += 1;
            continue;
        }
        report.published += 1;

        if let Some(marker) = &profile.mark_published {
            publisher::mark_processed(platform, msg, marker).await;
        }
    }

    phase.enter(SyncPhase::Done);
    info!(
        "[{}] Posted {} threads ({} failed, {} untitled skipped).",
        profile.name, report.published, report.publish_failed, report.skipped
    );
    Ok(SyncOutcome::Completed(report))
}
