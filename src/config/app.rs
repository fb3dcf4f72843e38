//! Application configuration loading from config.toml
//!
//! The config file maps Discord roles to library names, lists the Notion
//! trackers the bot can operate on, and identifies the guild and the
//! operator who receives failure diagnostics. Tokens are NOT configured
//! here; they come from the environment (see `secrets`).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Discord guild and role settings
    pub discord: DiscordConfig,
    /// Notion API settings
    pub notion: NotionConfig,
    /// Trackers the bot can operate on (one per Notion page)
    pub trackers: Vec<TrackerConfig>,
    /// Role → library mapping for access control and selection
    pub libraries: Vec<LibraryConfig>,
}

/// Discord-side settings.
#[derive(Debug, Deserialize)]
pub struct DiscordConfig {
    /// Guild the library roles live in
    pub guild_id: u64,
    /// Role that gates the update commands
    pub developer_role_id: u64,
    /// User DMed with diagnostics when a command fails
    pub operator_user_id: u64,
}

/// Notion-side settings.
#[derive(Debug, Deserialize)]
pub struct NotionConfig {
    /// `Notion-Version` header value sent on every request
    pub api_version: String,
}

/// One tracking source: a Notion page backed by a data source.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Display name offered in command choices
    pub name: String,
    /// Notion page id of the tracker
    pub page_id: String,
    /// Id of the data source holding the tracking rows
    pub data_source_id: String,
}

/// One library a guild role maintains.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Guild role whose holders maintain this library
    pub role_id: u64,
    /// Library name, matching the row title in every tracker
    pub name: String,
}

impl AppConfig {
    /// Looks up the tracker for a Notion page id (case-insensitive, since
    /// Notion is inconsistent about id casing).
    #[must_use]
    pub fn tracker_by_page(&self, page_id: &str) -> Option<&TrackerConfig> {
        self.trackers
            .iter()
            .find(|tracker| tracker.page_id.eq_ignore_ascii_case(page_id))
    }

    /// Looks up a library mapping by role id.
    #[must_use]
    pub fn library_by_role(&self, role_id: u64) -> Option<&LibraryConfig> {
        self.libraries
            .iter()
            .find(|library| library.role_id == role_id)
    }

    /// Looks up a library mapping by name (case-insensitive).
    #[must_use]
    pub fn library_by_name(&self, name: &str) -> Option<&LibraryConfig> {
        self.libraries
            .iter()
            .find(|library| library.name.eq_ignore_ascii_case(name))
    }

    fn validate(self) -> Result<Self> {
        if self.trackers.is_empty() {
            return Err(Error::Config {
                message: "config.toml must define at least one [[trackers]] entry".to_string(),
            });
        }
        if self.libraries.is_empty() {
            return Err(Error::Config {
                message: "config.toml must define at least one [[libraries]] entry".to_string(),
            });
        }
        Ok(self)
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or empty
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()
}

/// Loads application configuration from `CONFIG_PATH`, falling back to
/// `./config.toml`.
///
/// # Errors
/// Same conditions as [`load_config`].
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const SAMPLE: &str = r#"
        [discord]
        guild_id = 813_178_105_213_000_000
        developer_role_id = 813_178_105_213_000_001
        operator_user_id = 856_780_995_629_000_000

        [notion]
        api_version = "2025-09-03"

        [[trackers]]
        name = "Components V2"
        page_id = "aaaa1111bbbb2222"
        data_source_id = "cccc3333dddd4444"

        [[libraries]]
        role_id = 900_000_000_000_000_001
        name = "serenity"

        [[libraries]]
        role_id = 900_000_000_000_000_002
        name = "DisCatSharp"
    "#;

    fn parsed() -> AppConfig {
        toml::from_str::<AppConfig>(SAMPLE).unwrap().validate().unwrap()
    }

    #[test]
    fn test_parse_full_config() {
        let config = parsed();
        assert_eq!(config.discord.guild_id, 813_178_105_213_000_000);
        assert_eq!(config.notion.api_version, "2025-09-03");
        assert_eq!(config.trackers.len(), 1);
        assert_eq!(config.trackers[0].name, "Components V2");
        assert_eq!(config.libraries.len(), 2);
    }

    #[test]
    fn test_tracker_lookup_is_case_insensitive() {
        let config = parsed();
        assert!(config.tracker_by_page("AAAA1111BBBB2222").is_some());
        assert!(config.tracker_by_page("unknown").is_none());
    }

    #[test]
    fn test_library_lookups() {
        let config = parsed();
        assert_eq!(
            config
                .library_by_role(900_000_000_000_000_002)
                .map(|library| library.name.as_str()),
            Some("DisCatSharp")
        );
        assert!(config.library_by_name("discatsharp").is_some());
        assert!(config.library_by_role(1).is_none());
    }

    #[test]
    fn test_empty_trackers_rejected() {
        let toml_str = r#"
            trackers = []

            [discord]
            guild_id = 1
            developer_role_id = 2
            operator_user_id = 3

            [notion]
            api_version = "2025-09-03"

            [[libraries]]
            role_id = 4
            name = "serenity"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }
}
