use std::{sync::Arc, time::Duration};

use serenity::{http::Http, model::gateway::GatewayIntents, prelude::*};
use tracing::{info, warn};

use champolis_core::{
    attacks::AttackGifs,
    config::Config,
    forum_sync::{ForumLocks, SyncProfile},
    replies::Replies,
};

use crate::{handlers::Handler, DiscordPlatform};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub library: SyncProfile,
    pub suggestions: SyncProfile,
    pub forum_locks: Arc<ForumLocks>,
    pub replies: Arc<Replies>,
    pub attacks: Arc<AttackGifs>,
    pub download: reqwest::Client,
}

impl AppState {
    pub fn new(cfg: Arc<Config>, replies: Replies, attacks: AttackGifs) -> anyhow::Result<Self> {
        let download = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            library: SyncProfile::library(&cfg),
            suggestions: SyncProfile::suggestions(&cfg),
            cfg,
            forum_locks: Arc::new(ForumLocks::default()),
            replies: Arc::new(replies),
            attacks: Arc::new(attacks),
            download,
        })
    }

    pub fn platform(&self, http: Arc<Http>) -> DiscordPlatform {
        DiscordPlatform::new(http, self.download.clone())
    }
}

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let replies = match Replies::load(&cfg.replies_path) {
        Ok(r) => r,
        Err(e) => {
            warn!(
                "No canned replies loaded from {}: {e}",
                cfg.replies_path.display()
            );
            Replies::default()
        }
    };
    if replies.is_empty() {
        warn!("bobiz has no sentences to pick from");
    }

    let attacks = match AttackGifs::load(&cfg.attack_gifs_path) {
        Ok(a) => a,
        Err(e) => {
            warn!(
                "No attack GIFs loaded from {}: {e}",
                cfg.attack_gifs_path.display()
            );
            AttackGifs::default()
        }
    };

    info!("Command prefix: {}", cfg.command_prefix);
    info!(
        "Library: {} -> {}; suggestions: {} -> {}",
        cfg.library_channel, cfg.library_forum, cfg.suggestion_channel, cfg.priorities_forum
    );
    if cfg.master_role.is_none() {
        warn!("BOT_MASTER_ROLE_ID is not set: any member may run the sync commands");
    }

    let state = Arc::new(AppState::new(cfg.clone(), replies, attacks)?);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&cfg.discord_token, intents)
        .event_handler(Handler::new(state))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {e}"))?;

    // Graceful shutdown: close all shards on Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, stopping Discord client...");
            shard_manager.shutdown_all().await;
        }
    });

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {e}"))?;

    info!("Discord bot stopped");
    Ok(())
}
