use serenity::{model::channel::Message, prelude::*};
use tracing::{error, info, warn};

use champolis_core::{
    attacks::{usage_hint, ATTACK_COMMANDS},
    domain::{GuildId, RoleId, UserId},
    forum_sync::{run_sync, SyncOutcome, SyncProfile},
    security::{sync_access, SyncAccess},
};

use crate::router::AppState;

const NOT_A_MASTER: &str = "Only bot masters can sync the forums. Ask for the role first.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    SyncLibrary,
    SyncSuggestions,
    Bobiz,
    Attack,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sync_lib" => Some(Self::SyncLibrary),
            "sync_sugg" => Some(Self::SyncSuggestions),
            "bobiz" => Some(Self::Bobiz),
            n if ATTACK_COMMANDS.contains(&n) => Some(Self::Attack),
            _ => None,
        }
    }
}

/// Split `--name rest...` into a lowercased name and the rest.
///
/// `None` when the text does not start with `prefix`.
fn parse_command(text: &str, prefix: &str) -> Option<(String, String)> {
    let body = text.trim_start().strip_prefix(prefix)?;
    let mut parts = body.trim_start().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").trim().to_lowercase();
    let rest = parts.next().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, rest))
}

/// Recognized command in `text`, if any; arguments are ignored.
pub(crate) fn command_in(text: &str, prefix: &str) -> Option<Command> {
    let (name, _rest) = parse_command(text, prefix)?;
    Command::from_name(&name)
}

pub(crate) async fn handle_command(ctx: &Context, msg: &Message, cmd: Command, state: &AppState) {
    match cmd {
        Command::SyncLibrary => handle_sync(ctx, msg, &state.library, state).await,
        Command::SyncSuggestions => handle_sync(ctx, msg, &state.suggestions, state).await,
        Command::Bobiz => handle_bobiz(ctx, msg, state).await,
        Command::Attack => handle_attack(ctx, msg, state).await,
    }
}

async fn handle_sync(ctx: &Context, msg: &Message, profile: &SyncProfile, state: &AppState) {
    let roles: Vec<RoleId> = msg
        .member
        .as_ref()
        .map(|m| m.roles.iter().map(|r| RoleId(r.get())).collect())
        .unwrap_or_default();

    match sync_access(
        msg.guild_id.map(|g| GuildId(g.get())),
        &roles,
        state.cfg.command_guild,
        state.cfg.master_role,
    ) {
        SyncAccess::Allowed => {}
        SyncAccess::WrongGuild => {
            info!(
                "Ignoring {} sync request from {} outside the command guild",
                profile.name, msg.author.id
            );
            return;
        }
        SyncAccess::MissingRole => {
            if let Err(e) = msg.reply(ctx, NOT_A_MASTER).await {
                warn!("Failed to reply to {}: {e}", msg.author.id);
            }
            return;
        }
    }

    // The command message itself should not linger in the channel.
    if let Err(e) = msg.delete(ctx).await {
        warn!("Failed to delete command message {}: {e}", msg.id);
    }

    run_profile(ctx, profile, state).await;
}

pub(crate) async fn run_profile(ctx: &Context, profile: &SyncProfile, state: &AppState) {
    info!("Starting {} sync", profile.name);
    let platform = state.platform(ctx.http.clone());
    match run_sync(&platform, profile, &state.forum_locks).await {
        Ok(SyncOutcome::Completed(report)) => info!(
            "{} sync done: deleted {}, published {}, failed {}",
            profile.name, report.deleted, report.published, report.publish_failed
        ),
        Ok(SyncOutcome::Aborted(errors)) => warn!(
            "{} sync aborted with {} channel error(s)",
            profile.name,
            errors.len()
        ),
        Err(e) => error!("{} sync failed: {e}", profile.name),
    }
}

async fn handle_bobiz(ctx: &Context, msg: &Message, state: &AppState) {
    let Some(reply) = state
        .replies
        .random_reply_for(UserId(msg.author.id.get()))
    else {
        warn!("bobiz: no canned replies configured");
        return;
    };

    if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
        warn!("Failed to send bobiz reply in {}: {e}", msg.channel_id);
    }
}

async fn handle_attack(ctx: &Context, msg: &Message, state: &AppState) {
    let reply = match msg.mentions.first() {
        None => usage_hint(&state.cfg.command_prefix),
        Some(target) => match state.attacks.random_reply_for(UserId(target.id.get())) {
            Some(r) => r,
            None => {
                warn!("attack: no GIFs configured");
                return;
            }
        },
    };

    if let Err(e) = msg.reply(ctx, reply).await {
        warn!("Failed to send attack reply in {}: {e}", msg.channel_id);
    }
}
