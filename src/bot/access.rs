//! Access control for maintainer commands.
//!
//! Maps the invoking member to the set of libraries they may update:
//! administrators get every configured library, everyone else needs the
//! library-developer role and gets the libraries whose roles they hold.

use crate::bot::{BotData, Error};
use crate::config::LibraryConfig;
use crate::errors::Result;
use poise::serenity_prelude as serenity;
use tracing::debug;

/// The caller's resolved permissions for the update flow.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    /// Whether the caller bypassed the role gate as an administrator
    pub is_admin: bool,
    /// Libraries the caller may update
    pub libraries: Vec<LibraryConfig>,
}

/// Checks whether the invoking user may run maintainer commands.
///
/// Returns `None` after replying with the denial reason; callers just
/// return early in that case.
///
/// # Errors
/// Only fails on Discord transport errors while replying.
pub async fn check_access(ctx: poise::Context<'_, BotData, Error>) -> Result<Option<AccessGrant>> {
    let config = &ctx.data().config;

    let Some(member) = ctx.author_member().await else {
        ctx.say("You need to be a member of the tracking server to use this command.")
            .await?;
        return Ok(None);
    };

    let is_admin = member
        .permissions
        .is_some_and(|permissions| permissions.administrator());

    let developer_role = serenity::RoleId::new(config.discord.developer_role_id);
    if !is_admin && !member.roles.contains(&developer_role) {
        ctx.say("You need to be a library developer to use this command.")
            .await?;
        return Ok(None);
    }

    let libraries: Vec<LibraryConfig> = if is_admin {
        config.libraries.clone()
    } else {
        config
            .libraries
            .iter()
            .filter(|library| {
                member
                    .roles
                    .contains(&serenity::RoleId::new(library.role_id))
            })
            .cloned()
            .collect()
    };

    if libraries.is_empty() {
        ctx.say(
            "You do not have any library roles assigned to you. \
             Please contact a server administrator.",
        )
        .await?;
        return Ok(None);
    }

    debug!(
        user = %ctx.author().id,
        is_admin,
        libraries = libraries.len(),
        "access granted"
    );
    Ok(Some(AccessGrant { is_admin, libraries }))
}
