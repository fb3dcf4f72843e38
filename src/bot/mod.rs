//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the tracker: all slash
//! commands, the interactive update flow, access control, autocomplete, and
//! the framework wiring, on top of the framework-agnostic core.

/// Access control for maintainer commands
pub mod access;
/// Discord command implementations (tracking, statistics, dev, general)
pub mod commands;
/// Language → custom emoji mapping for select menus
pub mod emojis;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::cache::StatisticsCache;
use crate::config::AppConfig;
use crate::errors;
use crate::notion::NotionClient;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared data available to all bot commands.
#[derive(Debug)]
pub struct BotData {
    /// Application configuration (trackers, role mappings, operator)
    pub config: Arc<AppConfig>,
    /// Notion REST client
    pub notion: NotionClient,
    /// Last-fetched statistics slot, reused by `/cached_statistics`
    pub statistics_cache: StatisticsCache,
}

/// Error type Poise uses for this bot.
pub type Error = errors::Error;
/// Command context type.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn notify_operator(ctx: Context<'_>, error: &Error) {
    let operator = serenity::UserId::new(ctx.data().config.discord.operator_user_id);
    let detail = format!(
        "Command `{}` failed — Notion might need a look.\n```\n{}\n```",
        ctx.command().qualified_name,
        error
    );
    match operator.create_dm_channel(ctx.serenity_context()).await {
        Ok(dm) => {
            if let Err(e) = dm.id.say(ctx.http(), detail).await {
                error!("Failed to DM operator: {e}");
            }
        }
        Err(e) => error!("Failed to open operator DM channel: {e}"),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx
                .say(
                    "Something went wrong while talking to Notion. \
                     A maintainer has been notified — please try again later.",
                )
                .await
            {
                error!("Failed to send error message: {e}");
            }
            notify_operator(ctx, &error).await;
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            let reply = format!(
                "This command is on cooldown — try again in {}s.",
                remaining_cooldown.as_secs().max(1)
            );
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send cooldown message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Warms the statistics cache for the first configured tracker so
/// `/cached_statistics` works right after startup. Best-effort only.
async fn warm_statistics_cache(
    notion: NotionClient,
    config: Arc<AppConfig>,
    cache: StatisticsCache,
) {
    let Some(tracker) = config.trackers.first() else {
        return;
    };
    match commands::statistics::fetch_statistics_bundle(&notion, tracker).await {
        Ok(bundle) => cache.set(bundle).await,
        Err(e) => warn!("Statistics cache warm-up failed: {e}"),
    }
}

/// Builds the Poise framework and runs the bot until the gateway
/// connection ends.
///
/// # Errors
/// Fails when the client cannot be built or the gateway connection errors
/// out.
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    notion: NotionClient,
) -> errors::Result<()> {
    let statistics_cache = StatisticsCache::new();
    let warm_notion = notion.clone();
    let warm_config = Arc::clone(&config);
    let warm_cache = statistics_cache.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::update_status(),
                commands::get_status(),
                commands::statistics(),
                commands::cached_statistics(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tokio::spawn(warm_statistics_cache(warm_notion, warm_config, warm_cache));
                Ok(BotData {
                    config,
                    notion,
                    statistics_cache,
                })
            })
        })
        .build();

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_MEMBERS;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}
