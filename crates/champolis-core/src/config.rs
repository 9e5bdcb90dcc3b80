use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    domain::{ChannelId, GuildId, RoleId},
    errors::Error,
    Result,
};

// Channel ids of the community server the bot was written for.
const DEFAULT_LIBRARY_CHANNEL_ID: u64 = 1441676274790563920;
const DEFAULT_LIBRARY_FORUM_ID: u64 = 1441676312560533658;
const DEFAULT_SUGGESTION_CHANNEL_ID: u64 = 1441660601460850708;
const DEFAULT_PRIORITIES_FORUM_ID: u64 = 1441702171136626768;

/// Discord returns at most 100 messages per history page.
pub const MAX_FETCH_LIMIT: u8 = 100;

/// Typed configuration, built once at startup and passed into every sync.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub discord_token: String,
    pub command_prefix: String,

    // Access
    pub command_guild: Option<GuildId>,
    pub master_role: Option<RoleId>,

    // Library feature
    pub library_channel: ChannelId,
    pub library_forum: ChannelId,

    // Suggestions feature
    pub suggestion_channel: ChannelId,
    pub priorities_forum: ChannelId,
    pub min_reactions: u64,
    pub processed_mark: String,

    // Shared sync constants
    pub message_fetch_limit: u8,
    pub reaction_emoji: String,

    // Canned replies
    pub replies_path: PathBuf,
    pub attack_gifs_path: PathBuf,

    // Behavior flags
    pub auto_sync_on_post: bool,
}

impl Config {
    /// Load from the process environment (after an optional `.env`).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let discord_token = get("DISCORD_TOKEN").unwrap_or_default();
        if discord_token.trim().is_empty() {
            return Err(Error::Config(
                "DISCORD_TOKEN environment variable is required".to_string(),
            ));
        }

        let command_prefix = get("COMMAND_PREFIX").unwrap_or_else(|| "--".to_string());

        let command_guild = parse_id("COMMAND_GUILD_ID", get("COMMAND_GUILD_ID"))?.map(GuildId);
        let master_role = parse_id("BOT_MASTER_ROLE_ID", get("BOT_MASTER_ROLE_ID"))?.map(RoleId);

        let channel = |key: &str, default: u64| -> Result<ChannelId> {
            Ok(ChannelId(parse_id(key, get(key))?.unwrap_or(default)))
        };
        let library_channel = channel("LIBRARY_CHANNEL_ID", DEFAULT_LIBRARY_CHANNEL_ID)?;
        let library_forum = channel("LIBRARY_FORUM_ID", DEFAULT_LIBRARY_FORUM_ID)?;
        let suggestion_channel = channel("SUGGESTION_CHANNEL_ID", DEFAULT_SUGGESTION_CHANNEL_ID)?;
        let priorities_forum = channel("PRIORITIES_FORUM_ID", DEFAULT_PRIORITIES_FORUM_ID)?;

        let message_fetch_limit = parse_u64("MESSAGE_FETCH_LIMIT", get("MESSAGE_FETCH_LIMIT"))?
            .unwrap_or(50)
            .clamp(1, MAX_FETCH_LIMIT as u64) as u8;
        let min_reactions = parse_u64("MIN_REACTIONS", get("MIN_REACTIONS"))?.unwrap_or(1);

        let reaction_emoji = get("REACTION_EMOJI").unwrap_or_else(|| "✅".to_string());
        let processed_mark = get("PROCESSED_MARK").unwrap_or_else(|| "📌".to_string());
        check_emoji("REACTION_EMOJI", &reaction_emoji)?;
        check_emoji("PROCESSED_MARK", &processed_mark)?;

        let replies_path =
            PathBuf::from(get("REPLIES_PATH").unwrap_or_else(|| "replies.json".to_string()));
        let attack_gifs_path =
            PathBuf::from(get("ATTACK_GIFS_PATH").unwrap_or_else(|| "attack.json".to_string()));

        let auto_sync_on_post = get("AUTO_SYNC_ON_POST")
            .map(|s| parse_bool(&s))
            .unwrap_or(false);

        Ok(Self {
            discord_token,
            command_prefix,
            command_guild,
            master_role,
            library_channel,
            library_forum,
            suggestion_channel,
            priorities_forum,
            min_reactions,
            processed_mark,
            message_fetch_limit,
            reaction_emoji,
            replies_path,
            attack_gifs_path,
            auto_sync_on_post,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_id(key: &str, v: Option<String>) -> Result<Option<u64>> {
    match parse_u64(key, v)? {
        Some(0) => Err(Error::Config(format!("{key} must be a non-zero id"))),
        other => Ok(other),
    }
}

/// A `name:id` custom emoji needs a non-zero id; anything else is unicode.
fn check_emoji(key: &str, emoji: &str) -> Result<()> {
    match emoji.rsplit_once(':').map(|(_, id)| id.trim().parse::<u64>()) {
        Some(Ok(0)) => Err(Error::Config(format!(
            "{key} custom emoji id must be non-zero: {emoji}"
        ))),
        _ => Ok(()),
    }
}

fn parse_u64(key: &str, v: Option<String>) -> Result<Option<u64>> {
    let Some(v) = v else {
        return Ok(None);
    };
    v.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} is not a valid number: {v}")))
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
