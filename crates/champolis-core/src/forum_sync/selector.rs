use std::cmp::Reverse;

use tracing::debug;

use crate::{
    config::MAX_FETCH_LIMIT,
    domain::{ChannelRef, SourceMessage},
    ports::ForumPlatform,
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// Fewest reactions first; the most voted post ends up newest in the forum.
    Ascending,
    /// Most reactions first.
    Descending,
}

/// Which source messages a sync considers, and in what order it posts them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionRule {
    pub limit: u8,
    pub emoji: String,
    pub min_reactions: Option<u64>,
    pub order: SortOrder,
}

/// Fetch the recent history of `channel` and rank it by `rule`.
pub async fn select_messages(
    platform: &dyn ForumPlatform,
    channel: ChannelRef,
    rule: &SelectionRule,
) -> Result<Vec<SourceMessage>> {
    let limit = rule.limit.clamp(1, MAX_FETCH_LIMIT);
    let fetched = platform.fetch_recent_messages(channel.id, limit).await?;
    let fetched_len = fetched.len();

    let ranked = rank(fetched, rule);
    debug!(
        "Selected {} of {} messages from channel {}",
        ranked.len(),
        fetched_len,
        channel.id
    );
    Ok(ranked)
}

/// Filter by the threshold, then stable-sort by reaction count.
pub fn rank(messages: Vec<SourceMessage>, rule: &SelectionRule) -> Vec<SourceMessage> {
    let mut kept: Vec<SourceMessage> = match rule.min_reactions {
        Some(min) => messages
            .into_iter()
            .filter(|m| m.reaction_count(&rule.emoji) >= min)
            .collect(),
        None => messages,
    };

    match rule.order {
        SortOrder::Ascending => kept.sort_by_key(|m| m.reaction_count(&rule.emoji)),
        SortOrder::Descending => kept.sort_by_key(|m| Reverse(m.reaction_count(&rule.emoji))),
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChannelId, ChannelKind, ReactionTally},
        forum_sync::fake::{message, FakePlatform},
    };

    fn rule(min: Option<u64>, order: SortOrder) -> SelectionRule {
        SelectionRule {
            limit: 50,
            emoji: "✅".to_string(),
            min_reactions: min,
            order,
        }
    }

    fn ids(msgs: &[SourceMessage]) -> Vec<u64> {
        msgs.iter().map(|m| m.reference.message_id.0).collect()
    }

    #[test]
    fn ascending_is_stable() {
        let msgs = vec![
            message(1, 1, "a", 3),
            message(1, 2, "b", 1),
            message(1, 3, "c", 3),
            message(1, 4, "d", 0),
            message(1, 5, "e", 1),
        ];
        let out = rank(msgs, &rule(None, SortOrder::Ascending));
        assert_eq!(ids(&out), vec![4, 2, 5, 1, 3]);
    }

    #[test]
    fn descending_is_stable() {
        let msgs = vec![
            message(1, 1, "a", 2),
            message(1, 2, "b", 5),
            message(1, 3, "c", 2),
            message(1, 4, "d", 5),
        ];
        let out = rank(msgs, &rule(None, SortOrder::Descending));
        assert_eq!(ids(&out), vec![2, 4, 1, 3]);
    }

    #[test]
    fn threshold_drops_low_counts() {
        let msgs = vec![
            message(1, 1, "a", 0),
            message(1, 2, "b", 1),
            message(1, 3, "c", 4),
        ];
        let out = rank(msgs, &rule(Some(1), SortOrder::Descending));
        assert_eq!(ids(&out), vec![3, 2]);
    }

    #[test]
    fn only_the_configured_emoji_counts() {
        let mut m = message(1, 1, "a", 0);
        m.reactions = vec![
            ReactionTally {
                emoji: "❤️".to_string(),
                count: 9,
            },
            ReactionTally {
                emoji: "✅".to_string(),
                count: 1,
            },
        ];
        assert_eq!(m.reaction_count("✅"), 1);
        assert_eq!(m.reaction_count("👍"), 0);
        let out = rank(vec![m], &rule(Some(2), SortOrder::Ascending));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn fetch_respects_limit() {
        let msgs = (1..=5).map(|i| message(1, i, "x", 0)).collect();
        let p = FakePlatform::default().with_messages(1, msgs);
        let channel = ChannelRef {
            id: ChannelId(1),
            kind: ChannelKind::Text,
        };
        let mut r = rule(None, SortOrder::Ascending);
        r.limit = 3;
        let out = select_messages(&p, channel, &r).await.unwrap();
        assert_eq!(ids(&out), vec![1, 2, 3]);
    }
}
