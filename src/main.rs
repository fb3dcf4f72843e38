use dotenvy::dotenv;
use library_tracker::errors::Result;
use library_tracker::notion::NotionClient;
use library_tracker::{bot, config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = Arc::new(config::load_app_configuration()?);
    info!(
        "Loaded configuration with {} tracker(s) and {} library mapping(s).",
        app_config.trackers.len(),
        app_config.libraries.len()
    );

    // 4. Build the Notion client
    let notion_token = config::secrets::notion_token()?;
    let notion = NotionClient::new(&notion_token, &app_config.notion.api_version)?;

    // 5. Run the bot. The Discord token is read directly before use, not
    // stored in the config.
    let discord_token = config::secrets::discord_token()?;
    bot::run_bot(discord_token, app_config, notion).await?;

    Ok(())
}
