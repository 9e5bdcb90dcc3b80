use tracing::{error, info};

use crate::{domain::ChannelRef, ports::ForumPlatform, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub deleted: usize,
    pub failed: usize,
}

/// Delete every thread of `forum`, active and archived.
///
/// Listing errors propagate; a failed delete is logged and skipped.
pub async fn clear_forum(platform: &dyn ForumPlatform, forum: ChannelRef) -> Result<ResetReport> {
    info!("Clearing forum {} threads...", forum.id);

    let mut threads = platform.list_active_threads(forum.id).await?;
    threads.extend(platform.list_archived_threads(forum.id).await?);

    let mut report = ResetReport::default();
    for thread in threads {
        match platform.delete_thread(thread).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                error!("Failed to delete thread {thread}: {e}");
                report.failed += 1;
            }
        }
    }

    info!("Deleted {} threads from forum {}.", report.deleted, forum.id);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChannelId, ChannelKind, ThreadId},
        forum_sync::fake::FakePlatform,
    };

    fn forum(id: u64) -> ChannelRef {
        ChannelRef {
            id: ChannelId(id),
            kind: ChannelKind::Forum,
        }
    }

    #[tokio::test]
    async fn clears_active_and_archived() {
        let p = FakePlatform::default()
            .with_active_threads(2, &[10, 11, 12])
            .with_archived_threads(2, &[13])
            .with_active_threads(3, &[99]);

        let report = clear_forum(&p, forum(2)).await.unwrap();
        assert_eq!(report, ResetReport { deleted: 4, failed: 0 });
        assert_eq!(p.thread_count(2), 0);
        // Other forums are untouched.
        assert_eq!(p.thread_count(3), 1);
    }

    #[tokio::test]
    async fn failed_delete_does_not_stop_the_batch() {
        let p = FakePlatform::default()
            .with_active_threads(2, &[10, 11, 12])
            .failing_delete(11);

        let report = clear_forum(&p, forum(2)).await.unwrap();
        assert_eq!(report, ResetReport { deleted: 2, failed: 1 });
        assert_eq!(p.deleted(), vec![ThreadId(10), ThreadId(12)]);
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let p = FakePlatform::default()
            .with_active_threads(2, &[10])
            .failing_list();
        assert!(clear_forum(&p, forum(2)).await.is_err());
        assert!(p.deleted().is_empty());
    }

    #[tokio::test]
    async fn empty_forum() {
        let p = FakePlatform::default();
        let report = clear_forum(&p, forum(2)).await.unwrap();
        assert_eq!(report, ResetReport::default());
    }
}
