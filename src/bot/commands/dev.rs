//! Developer-only diagnostic commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::bot::commands::statistics::{ColorModeChoice, send_statistics_reply};
    use crate::bot::{BotData, Error};
    use crate::errors::Result;

    /// Re-renders the charts from the last fetched statistics without
    /// touching Notion. For chart theming.
    #[poise::command(slash_command, owners_only)]
    pub async fn cached_statistics(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The color mode for the statistics"] color_mode: ColorModeChoice,
        #[description = "Whether to display the charts large. Defaults to false."]
        large_statistics: Option<bool>,
        #[description = "Whether to hide the output from public (only you can see it). Defaults to false."]
        ephemeral: Option<bool>,
    ) -> Result<()> {
        if ephemeral.unwrap_or(false) {
            ctx.defer_ephemeral().await?;
        } else {
            ctx.defer().await?;
        }

        let Some(bundle) = ctx.data().statistics_cache.get().await else {
            ctx.say("The cache is not populated. Please use /statistics first.")
                .await?;
            return Ok(());
        };

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
