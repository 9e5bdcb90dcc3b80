//! Serenity event handler implementation.
//!
//! Routes prefixed commands to `commands` and, when enabled, starts a sync
//! whenever a titled post lands in one of the source channels.

use std::sync::Arc;

use serenity::{
    async_trait,
    model::{channel::Message, gateway::Ready},
    prelude::*,
};
use tracing::info;

use champolis_core::{domain::ChannelId, forum_sync::has_title};

use crate::router::AppState;

mod commands;

pub struct Handler {
    state: Arc<AppState>,
}

impl Handler {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let state = &self.state;
        if let Some(cmd) = commands::command_in(&msg.content, &state.cfg.command_prefix) {
            commands::handle_command(&ctx, &msg, cmd, state).await;
            return;
        }

        if !state.cfg.auto_sync_on_post || !has_title(&msg.content) {
            return;
        }

        let channel = ChannelId(msg.channel_id.get());
        let profile = if channel == state.library.source_channel {
            &state.library
        } else if channel == state.suggestions.source_channel {
            &state.suggestions
        } else {
            return;
        };
        info!("Titled post {} in {}: auto-sync", msg.id, channel);
        commands::run_profile(&ctx, profile, state).await;
    }
}
