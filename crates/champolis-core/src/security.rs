use crate::domain::{GuildId, RoleId};

// ============== Command access ==============

/// Outcome of the access check for the sync commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncAccess {
    Allowed,
    /// Command issued outside the configured command guild (or in a DM).
    WrongGuild,
    /// Author lacks the configured master role.
    MissingRole,
}

/// Sync commands mutate forums, so they are gated by guild and role.
///
/// With neither restriction configured every guild member may sync.
pub fn sync_access(
    guild: Option<GuildId>,
    author_roles: &[RoleId],
    command_guild: Option<GuildId>,
    master_role: Option<RoleId>,
) -> SyncAccess {
    let Some(guild) = guild else {
        return SyncAccess::WrongGuild;
    };
    if let Some(required) = command_guild {
        if guild != required {
            return SyncAccess::WrongGuild;
        }
    }
    if let Some(role) = master_role {
        if !author_roles.contains(&role) {
            return SyncAccess::MissingRole;
        }
    }
    SyncAccess::Allowed
}
