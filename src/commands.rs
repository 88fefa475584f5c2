use crate::paynow::SlugDescriptor;
use crate::report::{TicketContext, admin_overview_embed, inventory_embed, profile_embed};
use crate::steam::extract_steam_ids;
use crate::validation::{
    ModalAnswer, TicketType, Validation, missing_info_embed, validate_steam_ids,
};
use crate::{COMMAND_TARGET, Context, Error};
use poise::{CreateReply, command};
use std::fmt::Write as _;
use tracing::debug;

/// Basic ping command
/// This command is used to check if the bot is responsive.
#[command(prefix_command, slash_command, guild_only)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Pong!").await?;
    Ok(())
}

/// Show a player's PayNow inventory
#[command(slash_command, guild_only)]
pub async fn inventory(
    ctx: Context<'_>,
    #[description = "SteamID64, profile URL or vanity name"] steam: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let data = ctx.data();

    let Some(steam64) = resolve_input(data, &steam).await else {
        ctx.say(format!("Could not resolve a Steam account from `{steam}`."))
            .await?;
        return Ok(());
    };

    match data.inventory_blocks(&steam64).await {
        Some(blocks) => {
            ctx.send(CreateReply::default().embed(inventory_embed(&steam64, &blocks)))
                .await?;
        }
        None => {
            ctx.say(format!("No PayNow customer found for `{steam64}`."))
                .await?;
        }
    }
    Ok(())
}

/// Show Steam and server information for a player
#[command(slash_command, guild_only)]
pub async fn profile(
    ctx: Context<'_>,
    #[description = "SteamID64, profile URL or vanity name"] steam: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let data = ctx.data();

    let profile = match resolve_input(data, &steam).await {
        Some(steam64) => data.player_profile(&steam64).await,
        None => None,
    };
    match profile {
        Some(profile) => {
            ctx.send(CreateReply::default().embed(profile_embed(&profile)))
                .await?;
        }
        None => {
            ctx.say(format!("Could not resolve a Steam account from `{steam}`."))
                .await?;
        }
    }
    Ok(())
}

/// Build the staff Steam overview for a ticket
///
/// The first Steam ID is the ticket creator. On report tickets the following IDs are the
/// reported players.
#[command(slash_command, guild_only)]
pub async fn report(
    ctx: Context<'_>,
    #[description = "Text containing Steam IDs or profile links"] text: String,
    #[description = "Ticket channel name (defaults to this channel)"] ticket: Option<String>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let channel_name = match ticket {
        Some(name) => name,
        None => ctx.channel_id().name(ctx.http()).await.unwrap_or_default(),
    };
    let is_report = TicketType::from_channel_name(&channel_name) == TicketType::Report;
    let ids = extract_steam_ids(&text);
    debug!(target: COMMAND_TARGET, ids = ids.len(), is_report, "Building ticket overview");

    let (reporter, targets) = ctx.data().ticket_profiles(&ids, is_report).await;
    let ticket = TicketContext {
        channel_name,
        channel_id: ctx.channel_id().get(),
        creator_tag: ctx.author().tag(),
        creator_id: ctx.author().id.get(),
    };

    match admin_overview_embed(&ticket, reporter.as_ref(), &targets) {
        Some(embed) => {
            ctx.send(CreateReply::default().embed(embed)).await?;
        }
        None => {
            ctx.say("No Steam profiles found in that text.").await?;
        }
    }
    Ok(())
}

/// Show how a product slug is read
#[command(slash_command, guild_only)]
pub async fn slug(
    ctx: Context<'_>,
    #[description = "PayNow product slug, e.g. vip-10x-monthly"] slug: String,
) -> Result<(), Error> {
    let descriptor = ctx.data().slug_parser().parse(Some(&slug));
    ctx.send(
        CreateReply::default()
            .content(describe_slug(&slug, &descriptor))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Check whether ticket answers contain the Steam IDs the ticket type needs
///
/// Put each answer on its own line as `Question: answer`.
#[command(slash_command, guild_only)]
pub async fn validate(
    ctx: Context<'_>,
    #[description = "Ticket channel name, e.g. report-1234"] channel_name: String,
    #[description = "Ticket answers, one `Question: answer` per line"] text: String,
) -> Result<(), Error> {
    let answers = answers_from_text(&text);
    match validate_steam_ids(&channel_name, &answers) {
        Validation::Valid => {
            let ticket_type = TicketType::from_channel_name(&channel_name);
            ctx.say(format!(
                "All required Steam IDs are present for this {ticket_type} ticket."
            ))
            .await?;
        }
        Validation::Missing {
            ticket_type,
            missing,
        } => {
            ctx.send(CreateReply::default().embed(missing_info_embed(ticket_type, missing)))
                .await?;
        }
    }
    Ok(())
}

/// Accept pasted ids and profile links as well as bare vanity names
async fn resolve_input(data: &crate::Data, raw: &str) -> Option<String> {
    let candidate = extract_steam_ids(raw)
        .into_iter()
        .next()
        .unwrap_or_else(|| raw.trim().to_string());
    data.resolve_steam64(&candidate).await
}

fn describe_slug(slug: &str, descriptor: &SlugDescriptor) -> String {
    let mut text = format!(
        "`{slug}`\nProduct: **{}**\nServer: **{}**\nKind: {}",
        descriptor.product_name, descriptor.server_name, descriptor.kind
    );
    if let Some(runtime) = descriptor.display_runtime() {
        let _ = write!(text, "\nRuntime: {runtime}");
    }
    text
}

/// `Label: value` per line; lines without a label keep an empty one
fn answers_from_text(text: &str) -> Vec<ModalAnswer> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(": ") {
            Some((label, value)) => ModalAnswer::new(label.trim(), value.trim()),
            None => ModalAnswer::new("", line),
        })
        .collect()
}
