//! Token lookup from environment variables.
//!
//! Tokens never live in config.toml; they are read from the environment
//! (a `.env` file is loaded at startup) directly before use.

use crate::errors::Result;

/// Discord bot token from `DISCORD_BOT_TOKEN`.
///
/// # Errors
/// Fails when the variable is unset or not unicode.
pub fn discord_token() -> Result<String> {
    Ok(std::env::var("DISCORD_BOT_TOKEN")?)
}

/// Notion integration token from `NOTION_TOKEN`.
///
/// # Errors
/// Fails when the variable is unset or not unicode.
pub fn notion_token() -> Result<String> {
    Ok(std::env::var("NOTION_TOKEN")?)
}
