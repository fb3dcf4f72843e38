//! Statistics chart commands.
//!
//! `/statistics` fetches a full bundle (page, description, data source,
//! per-status snapshot), memoizes it in the statistics cache, derives the
//! count tables, and replies with the rendered pie and stacked bar charts.

use crate::bot::{BotData, Error};
use crate::cache::CachedStatistics;
use crate::charts;
use crate::config::TrackerConfig;
use crate::core::stats;
use crate::core::status::ColorMode;
use crate::errors::Result;
use crate::notion::NotionClient;
use crate::notion::types::{BlockChildren, Page};
use chrono::Utc;
use poise::serenity_prelude as serenity;

/// Accent color of the tracker embeds.
const EMBED_ACCENT: u32 = 0x0086_92FE;

/// Color mode choice offered on the chart commands.
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ColorModeChoice {
    /// Light Mode
    #[name = "Light Mode"]
    Light,
    /// Dark Mode
    #[name = "Dark Mode"]
    Dark,
}

impl From<ColorModeChoice> for ColorMode {
    fn from(choice: ColorModeChoice) -> Self {
        match choice {
            ColorModeChoice::Light => ColorMode::Light,
            ColorModeChoice::Dark => ColorMode::Dark,
        }
    }
}

/// Fetches everything the statistics commands need for one tracker.
///
/// The data source's own status options drive the per-status queries; an
/// option outside the canonical set aborts before any query runs.
pub(crate) async fn fetch_statistics_bundle(
    notion: &NotionClient,
    tracker: &TrackerConfig,
) -> Result<CachedStatistics> {
    let page = notion.get_page(&tracker.page_id).await?;
    let blocks = notion.get_block_children(&tracker.page_id).await?;
    let data_source = notion
        .find_data_source(&tracker.data_source_id)
        .await?
        .ok_or_else(|| Error::UnknownTracker {
            page_id: tracker.page_id.clone(),
        })?;
    let statuses = data_source.canonical_statuses()?;
    let snapshot = notion.fetch_statistics(&data_source.id, &statuses).await?;
    Ok(CachedStatistics {
        page_id: tracker.page_id.clone(),
        page,
        blocks,
        data_source,
        snapshot,
        fetched_at: Utc::now(),
    })
}

/// Header embed shared by the tracker commands: page title, callout
/// description with its emoji, emoji thumbnail, accent color.
pub(crate) fn tracker_header_embed(
    page: &Page,
    blocks: &BlockChildren,
    extra: Option<&str>,
) -> serenity::CreateEmbed {
    let title = page
        .title()
        .unwrap_or_else(|| "Implementation Tracking".to_string());

    let mut description = blocks
        .first_callout()
        .map(|callout| match callout.emoji() {
            Some(emoji) => format!("{emoji} {}", callout.text()),
            None => callout.text(),
        })
        .unwrap_or_default();
    if let Some(extra) = extra {
        if !description.is_empty() {
            description.push_str("\n\n");
        }
        description.push_str(extra);
    }

    let mut embed = serenity::CreateEmbed::default()
        .title(title)
        .description(description)
        .color(EMBED_ACCENT);
    if let Some(emoji) = page.icon.as_ref().and_then(|icon| icon.emoji.as_deref()) {
        embed = embed.thumbnail(format!(
            "https://www.emoji.family/api/emojis/{emoji}/fluent/png/128"
        ));
    }
    embed
}

/// Renders both charts from a bundle and sends the statistics reply.
pub(crate) async fn send_statistics_reply(
    ctx: poise::Context<'_, BotData, Error>,
    bundle: &CachedStatistics,
    mode: ColorMode,
    large_statistics: bool,
) -> Result<()> {
    let counts = stats::status_counts(&bundle.snapshot);
    let breakdown = stats::language_breakdown(&bundle.snapshot);

    let pie_bytes = charts::render_pie_chart(&counts, mode)?;
    let bar_bytes = charts::render_stacked_bar_chart(&breakdown, mode)?;

    let mut pie_embed = tracker_header_embed(&bundle.page, &bundle.blocks, None)
        .image("attachment://implementation_statistic.png")
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} records • fetched {}",
            bundle.snapshot.total_records(),
            bundle.fetched_at.format("%Y-%m-%d %H:%M UTC"),
        )));
    let mut bar_embed = serenity::CreateEmbed::default()
        .color(EMBED_ACCENT)
        .image("attachment://language_support.png");
    if large_statistics {
        pie_embed = pie_embed.field("Implementation Statistic", "\u{200b}", false);
        bar_embed = bar_embed.title("Language Support");
    }

    let mut reply = poise::CreateReply::default()
        .embed(pie_embed)
        .embed(bar_embed)
        .attachment(serenity::CreateAttachment::bytes(
            pie_bytes,
            "implementation_statistic.png",
        ))
        .attachment(serenity::CreateAttachment::bytes(
            bar_bytes,
            "language_support.png",
        ));
    if let Some(url) = bundle.page.public_url.clone() {
        reply = reply.components(vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new_link(url).label("Open Notion"),
        ])]);
    }

    ctx.send(reply).await?;
    Ok(())
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{ColorModeChoice, fetch_statistics_bundle, send_statistics_reply};
    use crate::bot::{BotData, Error, handlers::autocomplete};
    use crate::errors::Result;

    /// Renders status and language-support charts for a tracker.
    #[poise::command(slash_command, global_cooldown = 12)]
    pub async fn statistics(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The tracker to chart"]
        #[autocomplete = "autocomplete::autocomplete_tracker"]
        tracker: String,
        #[description = "The color mode for the statistics"] color_mode: ColorModeChoice,
        #[description = "Whether to display the charts large. Defaults to false."]
        large_statistics: Option<bool>,
        #[description = "Whether to hide the output from public (only you can see it). Defaults to true."]
        ephemeral: Option<bool>,
    ) -> Result<()> {
        if ephemeral.unwrap_or(true) {
            ctx.defer_ephemeral().await?;
        } else {
            ctx.defer().await?;
        }

        let Some(tracker) = ctx.data().config.tracker_by_page(&tracker).cloned() else {
            ctx.say("The selected tracker is not configured. Please contact a server administrator.")
                .await?;
            return Ok(());
        };

        let bundle = match fetch_statistics_bundle(&ctx.data().notion, &tracker).await {
            Ok(bundle) => bundle,
            Err(Error::NotionApi { status, .. }) if status == 400 || status == 404 => {
                ctx.say("The provided notion page ID is not valid. Please contact a server administrator.")
                    .await?;
                return Ok(());
            }
            Err(Error::UnknownTracker { .. }) => {
                ctx.say(
                    "The provided notion page ID does not have a corresponding data source ID \
                     in the configuration. Please contact a server administrator.",
                )
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Last-write-wins memoization for /cached_statistics.
        ctx.data().statistics_cache.set(bundle.clone()).await;

        send_statistics_reply(
            ctx,
            &bundle,
            color_mode.into(),
            large_statistics.unwrap_or(false),
        )
        .await
    }
}

// Re-export all commands
pub use inner::*;
