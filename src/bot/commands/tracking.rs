//! Status update and lookup commands.
//!
//! `/update_status` walks the maintainer through library selection, status
//! selection, and a prefilled modal, then patches the Notion row.
//! `/get_status` reports one library's record across every configured
//! tracker.

use crate::bot::{Error, emojis};
use crate::config::LibraryConfig;
use crate::core::record::TrackingRecord;
use crate::errors::Result;
use crate::notion::types::DataSource;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use std::time::Duration;

/// How long the user gets to pick from a select menu.
const SELECT_TIMEOUT: Duration = Duration::from_secs(60);
/// How long the user gets to fill out the update modal.
const MODAL_TIMEOUT: Duration = Duration::from_secs(300);

const TIMEOUT_MESSAGE: &str = "You took too long to respond. Please try again.";

/// Modal for the mutable text fields of a tracking record. The status is
/// chosen from a select menu beforehand because its options come from the
/// live data-source schema.
#[derive(Debug, Default, poise::Modal)]
#[name = "Library Status Update"]
struct UpdateStatusModal {
    #[name = "Pull Request / Commit"]
    #[placeholder = "Pull request or commit implementing the change"]
    pull_request_or_commit: Option<String>,
    #[name = "Released Version"]
    #[placeholder = "Version number releasing the change"]
    version: Option<String>,
    #[name = "Notes"]
    #[placeholder = "Additional notes (delays, caveats, ...)"]
    #[paragraph]
    notes: Option<String>,
}

/// Builds the library select menu rows, chunked to Discord's 25-option
/// limit with page-numbered placeholders beyond one chunk.
///
/// # Errors
/// Fails with [`Error::MissingRecord`] when any allowed library has no row
/// in the data source; an option without a record could never be updated.
fn library_select_rows(
    libraries: &[LibraryConfig],
    records: &HashMap<String, TrackingRecord>,
) -> Result<Vec<serenity::CreateActionRow>> {
    let mut options = Vec::with_capacity(libraries.len());
    for library in libraries {
        let record = records
            .get(&library.name)
            .ok_or_else(|| Error::MissingRecord {
                library: library.name.clone(),
            })?;
        let mut option = serenity::CreateSelectMenuOption::new(
            library.name.clone(),
            library.role_id.to_string(),
        )
        .description(format!("Currently: {}", record.status));
        if let Some(emoji_id) = emojis::language_emoji(&record.language) {
            option = option.emoji(serenity::ReactionType::Custom {
                animated: false,
                id: serenity::EmojiId::new(emoji_id),
                name: None,
            });
        }
        options.push(option);
    }

    let total_pages = options.len().div_ceil(25);
    let rows = options
        .chunks(25)
        .enumerate()
        .map(|(i, chunk)| {
            let placeholder = if total_pages <= 1 {
                "Select the library you want to update".to_string()
            } else {
                format!("Select the library you want to update (Page {})", i + 1)
            };
            serenity::CreateActionRow::SelectMenu(
                serenity::CreateSelectMenu::new(
                    format!("library_select_{i}"),
                    serenity::CreateSelectMenuKind::String {
                        options: chunk.to_vec(),
                    },
                )
                .placeholder(placeholder)
                .min_values(1)
                .max_values(1),
            )
        })
        .collect();
    Ok(rows)
}

/// Status select menu built from the data source's live option schema, with
/// the record's current status preselected.
fn status_select_row(data_source: &DataSource, current_status: &str) -> serenity::CreateActionRow {
    let options: Vec<serenity::CreateSelectMenuOption> = data_source
        .status_options()
        .iter()
        .map(|option| {
            serenity::CreateSelectMenuOption::new(option.name.clone(), option.id.clone())
                .default_selection(option.name.eq_ignore_ascii_case(current_status))
        })
        .collect();
    serenity::CreateActionRow::SelectMenu(
        serenity::CreateSelectMenu::new(
            "status_select",
            serenity::CreateSelectMenuKind::String { options },
        )
        .placeholder("Select the current status")
        .min_values(1)
        .max_values(1),
    )
}

fn selected_value(interaction: &serenity::ComponentInteraction) -> Option<String> {
    match &interaction.data.kind {
        serenity::ComponentInteractionDataKind::StringSelect { values } => values.first().cloned(),
        _ => None,
    }
}

/// Keeps API bodies short enough for a Discord code block.
fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 1500;
    if body.len() <= LIMIT {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|&(index, _)| index < LIMIT)
            .last()
            .map_or(0, |(index, c)| index + c.len_utf8());
        format!("{}…", &body[..cut])
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{
        MODAL_TIMEOUT, SELECT_TIMEOUT, TIMEOUT_MESSAGE, UpdateStatusModal, library_select_rows,
        selected_value, status_select_row, truncate_body,
    };
    use crate::bot::commands::statistics::tracker_header_embed;
    use crate::bot::{BotData, Error, access, handlers::autocomplete};
    use crate::core::record::TrackingRecord;
    use crate::errors::Result;
    use poise::serenity_prelude as serenity;
    use std::collections::HashMap;
    use std::fmt::Write as _;
    use tokio::task::JoinSet;
    use tracing::info;

    /// Updates one library's implementation status on a tracker.
    #[poise::command(slash_command, user_cooldown = 60)]
    pub async fn update_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The tracker to update"]
        #[autocomplete = "autocomplete::autocomplete_tracker"]
        tracker: String,
        #[description = "Whether to hide the output from public (only you can see it). Defaults to true."]
        ephemeral: Option<bool>,
    ) -> Result<()> {
        if ephemeral.unwrap_or(true) {
            ctx.defer_ephemeral().await?;
        } else {
            ctx.defer().await?;
        }

        let Some(grant) = access::check_access(ctx).await? else {
            return Ok(());
        };

        let Some(tracker) = ctx.data().config.tracker_by_page(&tracker).cloned() else {
            ctx.say("The selected tracker is not configured. Please contact a server administrator.")
                .await?;
            return Ok(());
        };

        let notion = &ctx.data().notion;
        let page = match notion.get_page(&tracker.page_id).await {
            Ok(page) => page,
            Err(Error::NotionApi { .. }) => {
                ctx.say("The provided notion page ID is not valid. Please contact a server administrator.")
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let blocks = notion.get_block_children(&tracker.page_id).await?;
        let Some(data_source) = notion.find_data_source(&tracker.data_source_id).await? else {
            ctx.say(
                "The provided notion page ID does not have a corresponding data source ID \
                 in the configuration. Please contact a server administrator.",
            )
            .await?;
            return Ok(());
        };

        let library_names: Vec<String> = grant
            .libraries
            .iter()
            .map(|library| library.name.clone())
            .collect();
        let records = notion
            .fetch_current_records(&data_source.id, &library_names)
            .await?;

        let select_rows = library_select_rows(&grant.libraries, &records)?;
        let note = if grant.is_admin {
            "Since you're a server administrator, you are able to modify every library."
        } else {
            "Based on your selected roles, we selected your library / libraries."
        };
        let embed = tracker_header_embed(
            &page,
            &blocks,
            Some(&format!(
                "**Please select the library you want to update.**\n-# {note}"
            )),
        );

        let reply_handle = ctx
            .send(
                poise::CreateReply::default()
                    .embed(embed)
                    .components(select_rows),
            )
            .await?;
        let message = reply_handle.message().await?;

        let Some(library_interaction) = message
            .await_component_interaction(ctx.serenity_context())
            .author_id(ctx.author().id)
            .timeout(SELECT_TIMEOUT)
            .await
        else {
            reply_handle
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .content(TIMEOUT_MESSAGE)
                        .components(vec![]),
                )
                .await?;
            return Ok(());
        };

        let selected_role: u64 = selected_value(&library_interaction)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        let Some(library) = ctx.data().config.library_by_role(selected_role).cloned() else {
            ctx.say("The selected library is not valid. Please contact a server administrator.")
                .await?;
            return Ok(());
        };
        let record = records
            .get(&library.name)
            .cloned()
            .ok_or_else(|| Error::MissingRecord {
                library: library.name.clone(),
            })?;

        let last_edited = record
            .last_touched()
            .map_or_else(|| "Unknown".to_string(), |at| at.format("%Y-%m-%d %H:%M UTC").to_string());
        let editor_note = record
            .last_modified_by
            .as_deref()
            .map_or(String::new(), |editor| format!(" by <@{editor}>"));
        library_interaction
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embeds(vec![])
                        .content(format!(
                            "Currently modifying **{}**.\nPlease select the new status.\n\
                             -# Last modification: {last_edited}{editor_note}",
                            library.name
                        ))
                        .components(vec![status_select_row(&data_source, record.status.as_str())]),
                ),
            )
            .await?;

        let Some(status_interaction) = message
            .await_component_interaction(ctx.serenity_context())
            .author_id(ctx.author().id)
            .timeout(SELECT_TIMEOUT)
            .await
        else {
            reply_handle
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .content(TIMEOUT_MESSAGE)
                        .components(vec![]),
                )
                .await?;
            return Ok(());
        };

        // Fall back to the record's current status when the selection cannot
        // be matched against the schema (mirrors the empty-submission case).
        let selected_option_id = selected_value(&status_interaction).unwrap_or_default();
        let chosen = data_source
            .status_options()
            .iter()
            .find(|option| option.id == selected_option_id)
            .or_else(|| {
                data_source
                    .status_options()
                    .iter()
                    .find(|option| option.name.eq_ignore_ascii_case(record.status.as_str()))
            })
            .ok_or_else(|| Error::UnknownStatus {
                value: selected_option_id.clone(),
            })?
            .clone();

        let defaults = UpdateStatusModal {
            pull_request_or_commit: record.pull_request_or_commit.clone(),
            version: record.released_version.clone(),
            notes: record.notes.clone(),
        };
        let submitted: Option<UpdateStatusModal> = poise::execute_modal_on_component_interaction(
            ctx,
            status_interaction,
            Some(defaults),
            Some(MODAL_TIMEOUT),
        )
        .await?;
        let Some(submitted) = submitted else {
            reply_handle
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .content(TIMEOUT_MESSAGE)
                        .components(vec![]),
                )
                .await?;
            return Ok(());
        };

        let page_title = page
            .title()
            .unwrap_or_else(|| tracker.name.clone());
        info!(
            library = %library.name,
            status = %chosen.name,
            "applying status update"
        );
        let update = notion
            .update_page(
                &record.id,
                &ctx.author().id.to_string(),
                &chosen.id,
                submitted.pull_request_or_commit.as_deref(),
                submitted.version.as_deref(),
                submitted.notes.as_deref(),
            )
            .await;
        match update {
            Ok(()) => {
                reply_handle
                    .edit(
                        ctx,
                        poise::CreateReply::default()
                            .content(format!(
                                "Successfully updated **{}** in **{page_title}**.\n\n\
                                 Please allow some time for Notion to reflect the changes.",
                                library.name
                            ))
                            .components(vec![]),
                    )
                    .await?;
            }
            Err(Error::NotionApi { body, .. }) => {
                reply_handle
                    .edit(
                        ctx,
                        poise::CreateReply::default()
                            .content(format!(
                                "Failed to update **{}** in **{page_title}**.\n\n\
                                 Please contact a server administrator.\n```json\n{}\n```",
                                library.name,
                                truncate_body(&body)
                            ))
                            .components(vec![]),
                    )
                    .await?;
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    /// Shows one library's status across every configured tracker.
    #[poise::command(slash_command)]
    pub async fn get_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The library to get the status from"]
        #[autocomplete = "autocomplete::autocomplete_library"]
        library: String,
        #[description = "Whether to hide the output from public (only you can see it). Defaults to true."]
        ephemeral: Option<bool>,
    ) -> Result<()> {
        if ephemeral.unwrap_or(true) {
            ctx.defer_ephemeral().await?;
        } else {
            ctx.defer().await?;
        }

        let Some(library) = ctx.data().config.library_by_name(&library).cloned() else {
            ctx.say("The selected library is not valid. Please contact a server administrator.")
                .await?;
            return Ok(());
        };

        // One lookup per tracker, joined into a map so arrival order is
        // irrelevant.
        let mut tasks: JoinSet<Result<(String, Option<TrackingRecord>)>> = JoinSet::new();
        for tracker in ctx.data().config.trackers.clone() {
            let notion = ctx.data().notion.clone();
            let library_name = library.name.clone();
            tasks.spawn(async move {
                let Some(source) = notion.find_data_source(&tracker.data_source_id).await? else {
                    return Ok((tracker.name, None));
                };
                let record = match notion.query_by_library(&source.id, &library_name).await? {
                    Some(page) => Some(TrackingRecord::from_page(&page)?),
                    None => None,
                };
                Ok((tracker.name, record))
            });
        }
        let mut by_tracker: HashMap<String, Option<TrackingRecord>> = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (tracker_name, record) = joined??;
            by_tracker.insert(tracker_name, record);
        }

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("Status of {}", library.name))
            .color(0x0086_92FE);
        for tracker in &ctx.data().config.trackers {
            let value = match by_tracker.get(&tracker.name).and_then(Option::as_ref) {
                Some(record) => {
                    let mut lines = format!(
                        "**Status:** {}\n**Language:** {}",
                        record.status, record.language
                    );
                    if let Some(version) = &record.released_version {
                        write!(lines, "\n**Released in:** {version}")?;
                    }
                    if let Some(pr) = &record.pull_request_or_commit {
                        write!(lines, "\n**PR / Commit:** {pr}")?;
                    }
                    if let Some(notes) = &record.notes {
                        write!(lines, "\n**Notes:** {notes}")?;
                    }
                    if let Some(touched) = record.last_touched() {
                        write!(lines, "\n**Last update:** {}", touched.format("%Y-%m-%d"))?;
                    }
                    lines
                }
                None => "_No tracking record_".to_string(),
            };
            embed = embed.field(tracker.name.clone(), value, false);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
