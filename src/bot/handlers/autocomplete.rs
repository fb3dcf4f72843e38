//! Autocomplete handlers for Discord slash command parameters.
//!
//! Both lists come straight from config.toml, so these never hit Notion.

use crate::bot::{BotData, Error};
use poise::serenity_prelude as serenity;

/// Provides autocomplete for tracker selection.
///
/// Choice labels are the configured tracker names; the submitted value is
/// the tracker's Notion page id.
pub async fn autocomplete_tracker(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let partial_lower = partial.to_lowercase();
    ctx.data()
        .config
        .trackers
        .iter()
        .filter(|tracker| tracker.name.to_lowercase().contains(&partial_lower))
        .map(|tracker| serenity::AutocompleteChoice::new(tracker.name.clone(), tracker.page_id.clone()))
        .take(25) // Discord autocomplete limit
        .collect()
}

/// Provides autocomplete for library names.
pub async fn autocomplete_library(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = ctx
        .data()
        .config
        .libraries
        .iter()
        .filter(|library| library.name.to_lowercase().contains(&partial_lower))
        .map(|library| library.name.clone())
        .take(25) // Discord autocomplete limit
        .collect();

    // Sort alphabetically for consistent UX
    matching.sort();
    matching
}
