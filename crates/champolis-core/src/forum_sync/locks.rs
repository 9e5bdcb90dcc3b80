use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::ChannelId;

/// One async mutex per destination forum.
///
/// Two syncs targeting the same forum would otherwise interleave deletions and
/// creations; holding the guard for the whole run serializes them.
#[derive(Default)]
pub struct ForumLocks {
    inner: Mutex<HashMap<ChannelId, Arc<Mutex<()>>>>,
}

impl ForumLocks {
    pub async fn lock_forum(&self, forum: ChannelId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(forum)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
