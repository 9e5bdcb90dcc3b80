use tracing::debug;

use crate::{
    domain::{ChannelId, ChannelKind, ChannelRef},
    ports::ForumPlatform,
};

/// Both handles of a sync plus every problem found while resolving them.
#[derive(Clone, Debug, Default)]
pub struct ResolvedChannels {
    pub source: Option<ChannelRef>,
    pub forum: Option<ChannelRef>,
    pub errors: Vec<String>,
}

impl ResolvedChannels {
    /// `(source, forum)` when both resolved to the expected kinds.
    pub fn validated(&self) -> Option<(ChannelRef, ChannelRef)> {
        if !self.errors.is_empty() {
            return None;
        }
        Some((self.source?, self.forum?))
    }
}

/// Look up the source text channel and the destination forum.
///
/// Never mutates anything. Lookup failures are reported like missing channels
/// so the caller aborts before touching the forum.
pub async fn resolve_channels(
    platform: &dyn ForumPlatform,
    label: &str,
    source_id: ChannelId,
    forum_id: ChannelId,
) -> ResolvedChannels {
    let mut errors = Vec::new();

    let source = resolve_one(
        platform,
        &format!("{label} source"),
        source_id,
        ChannelKind::Text,
        &mut errors,
    )
    .await;
    let forum = resolve_one(
        platform,
        &format!("{label} forum"),
        forum_id,
        ChannelKind::Forum,
        &mut errors,
    )
    .await;

    ResolvedChannels {
        source,
        forum,
        errors,
    }
}

async fn resolve_one(
    platform: &dyn ForumPlatform,
    name: &str,
    id: ChannelId,
    expected: ChannelKind,
    errors: &mut Vec<String>,
) -> Option<ChannelRef> {
    match platform.resolve_channel(id).await {
        Ok(Some(ch)) if ch.kind == expected => {
            debug!("Resolved {name} channel {id} ({})", ch.kind);
            Some(ch)
        }
        Ok(Some(ch)) => {
            errors.push(format!(
                "{name} channel (ID: {id}) is a {}, expected a {expected}",
                ch.kind
            ));
            None
        }
        Ok(None) => {
            errors.push(format!("{name} channel (ID: {id}) not found"));
            None
        }
        Err(e) => {
            errors.push(format!("{name} channel (ID: {id}) could not be fetched: {e}"));
            None
        }
    }
}
