use tracing::{error, info, warn};

use crate::{
    domain::{ChannelRef, ForumAttachment, NewThread, SourceMessage},
    ports::ForumPlatform,
};

/// Download the image attachments of `msg`; others are never fetched.
pub async fn collect_images(
    platform: &dyn ForumPlatform,
    msg: &SourceMessage,
) -> Vec<ForumAttachment> {
    let mut files = Vec::new();
    for attachment in msg.attachments.iter().filter(|a| a.is_image()) {
        match platform.download_attachment(attachment).await {
            Ok(bytes) => files.push(ForumAttachment {
                filename: attachment.filename.clone(),
                bytes,
            }),
            Err(e) => warn!(
                "Failed to download attachment {} of message {}: {e}",
                attachment.filename, msg.reference.message_id
            ),
        }
    }
    files
}

/// Create one forum thread. Returns whether it was created.
pub async fn publish_thread(
    platform: &dyn ForumPlatform,
    forum: ChannelRef,
    thread: &NewThread,
) -> bool {
    match platform.create_thread(forum.id, thread).await {
        Ok(id) => {
            info!("Created thread {id} '{}'", thread.title);
            true
        }
        Err(e) => {
            error!("Failed to create thread for '{}': {e}", thread.title);
            false
        }
    }
}

/// Mark a published source message: react with `marker`, then pin it.
///
/// Both steps are best-effort and independent of each other.
pub async fn mark_processed(platform: &dyn ForumPlatform, msg: &SourceMessage, marker: &str) {
    let id = msg.reference.message_id;

    if let Err(e) = platform.add_reaction(msg.reference, marker).await {
        error!("Failed to add processed mark to message {id}: {e}");
    }

    if msg.pinned {
        return;
    }
    if let Err(e) = platform.pin_message(msg.reference).await {
        error!("Failed to pin message {id}: {e}");
    }
}
