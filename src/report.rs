//! Ticket overview rendering
//!
//! Turns player profiles and inventory blocks into embed text for staff.

use crate::paynow::DisplayBlock;
use crate::steam::PlayerProfile;
use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter, Timestamp};
use std::fmt::Write as _;

/// Report tickets look up at most this many reported players
pub const MAX_REPORT_TARGETS: usize = 5;

const ZERO_WIDTH_SPACE: &str = "\u{200B}";
const OVERVIEW_COLOUR: u32 = 0x0099_FF;
const INVENTORY_COLOUR: u32 = 0x2FF2_00;

/// An embed field as `(name, value, inline)`
pub type EmbedField = (String, String, bool);

/// First unique id is the reporter; the rest are targets, but only for report tickets.
#[must_use]
pub fn split_reporter_and_targets(ids: &[String], is_report: bool) -> (Option<String>, Vec<String>) {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(id.clone());
        }
    }

    let mut iter = unique.into_iter();
    let reporter = iter.next();
    let targets = if is_report {
        iter.take(MAX_REPORT_TARGETS).collect()
    } else {
        Vec::new()
    };
    (reporter, targets)
}

#[must_use]
pub fn format_days_ago(days: u32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{n} days ago"),
    }
}

/// `3h 25m` style duration from seconds
#[must_use]
pub fn format_server_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours == 0 {
        format!("{minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// Zero Steam hours alongside logged server time means the library is hidden.
#[must_use]
pub fn rust_playtime_text(profile: &PlayerProfile) -> String {
    match (profile.rust_hours, profile.server_time()) {
        (Some(0), Some(_)) => "Private / Not Visible".to_string(),
        (Some(hours), _) => format!("{hours} hrs"),
        (None, _) => "N/A".to_string(),
    }
}

#[must_use]
pub fn pvp_line(profile: &PlayerProfile) -> String {
    let Some(pvp) = profile.stats.as_ref().and_then(|s| s.stats.pvp.as_ref()) else {
        return "PvP: No PvP data logged".to_string();
    };

    #[allow(clippy::cast_precision_loss)]
    let kd = match (pvp.kills, pvp.deaths) {
        (0, _) => "N/A".to_string(),
        (kills, 0) => format!("{:.2}", kills as f64),
        (kills, deaths) => format!("{:.2}", kills as f64 / deaths as f64),
    };

    format!("Stats: K: {} | D: {} | K/D: {kd}", pvp.kills, pvp.deaths)
}

#[must_use]
pub fn ban_line(profile: &PlayerProfile) -> String {
    let vac = profile.vac_bans.unwrap_or(0);
    let game = profile.game_bans.unwrap_or(0);
    let base = format!("Bans: VAC: {vac}, Game: {game}");

    if vac == 0 && game == 0 {
        return base;
    }
    match profile.days_since_last_ban {
        Some(days) => format!("{base} (last ban {})", format_days_ago(days)),
        None => base,
    }
}

/// Multi-line summary of one player
#[must_use]
pub fn profile_block(profile: &PlayerProfile) -> String {
    let mut value = String::new();
    let _ = writeln!(value, "Steam: {}", profile.steam_name);
    let _ = writeln!(value, "SteamID64: `{}`", profile.steam_id);
    let _ = writeln!(value, "Rust Playtime: {}", rust_playtime_text(profile));
    if let Some(seconds) = profile.server_time() {
        let _ = writeln!(value, "Server Playtime: {}", format_server_time(seconds));
    }
    let _ = writeln!(value, "{}", pvp_line(profile));
    let _ = writeln!(value, "{}", ban_line(profile));
    let _ = write!(
        value,
        "Links: [Steam Profile]({}) | [BattleMetrics]({})",
        profile.profile_url, profile.battlemetrics_url
    );
    value
}

/// Section header plus the player's block. Non-report tickets call it INFORMATION.
#[must_use]
pub fn reporter_fields(profile: &PlayerProfile, is_report: bool) -> Vec<EmbedField> {
    let section = if is_report { "REPORTER" } else { "INFORMATION" };
    vec![
        (format!("===== {section} ====="), ZERO_WIDTH_SPACE.to_string(), false),
        (ZERO_WIDTH_SPACE.to_string(), profile_block(profile), false),
    ]
}

#[must_use]
pub fn target_fields(profiles: &[PlayerProfile]) -> Vec<EmbedField> {
    if profiles.is_empty() {
        return Vec::new();
    }

    let mut fields = vec![(
        "===== TARGETS =====".to_string(),
        ZERO_WIDTH_SPACE.to_string(),
        false,
    )];
    fields.extend(profiles.iter().enumerate().map(|(idx, profile)| {
        (
            ZERO_WIDTH_SPACE.to_string(),
            format!("**Target {}**\n{}", idx + 1, profile_block(profile)),
            false,
        )
    }));
    fields
}

/// Where a ticket lives and who opened it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketContext {
    pub channel_name: String,
    pub channel_id: u64,
    pub creator_tag: String,
    pub creator_id: u64,
}

/// Staff-facing Steam overview. `None` when no profile could be found.
#[must_use]
pub fn admin_overview_embed(
    ticket: &TicketContext,
    reporter: Option<&PlayerProfile>,
    targets: &[PlayerProfile],
) -> Option<CreateEmbed> {
    if reporter.is_none() && targets.is_empty() {
        return None;
    }

    let is_report = !targets.is_empty();
    let mut fields = reporter
        .map(|profile| reporter_fields(profile, is_report))
        .unwrap_or_default();
    fields.extend(target_fields(targets));

    Some(
        CreateEmbed::new()
            .colour(OVERVIEW_COLOUR)
            .title("Ticket Steam Overview")
            .description(format!(
                "Ticket: #{} ({})\nCreated by: {} ({})",
                ticket.channel_name, ticket.channel_id, ticket.creator_tag, ticket.creator_id
            ))
            .fields(fields)
            .footer(CreateEmbedFooter::new(ticket.creator_tag.clone()))
            .timestamp(Timestamp::now()),
    )
}

/// Single-player information embed
#[must_use]
pub fn profile_embed(profile: &PlayerProfile) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .colour(OVERVIEW_COLOUR)
        .title(format!("Player: {}", profile.steam_name))
        .url(profile.profile_url.clone())
        .fields(reporter_fields(profile, false))
        .timestamp(Timestamp::now());
    if let Some(avatar) = &profile.avatar {
        embed = embed.thumbnail(avatar.clone());
    }
    embed
}

/// One embed field per display block
#[must_use]
pub fn inventory_embed(steam_id: &str, blocks: &[DisplayBlock]) -> CreateEmbed {
    CreateEmbed::new()
        .colour(INVENTORY_COLOUR)
        .title("Customer Inventory")
        .description(format!("SteamID64: `{steam_id}`"))
        .fields(blocks.iter().map(|block| (block.title.clone(), block.body(), false)))
        .timestamp(Timestamp::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steam::{EnardoStats, MiscStats, PvpStats, StatSections, battlemetrics_url, profile_url};

    fn profile(id: &str) -> PlayerProfile {
        PlayerProfile {
            steam_id: id.to_string(),
            steam_name: "Rusty".to_string(),
            profile_url: profile_url(id),
            battlemetrics_url: battlemetrics_url(id),
            ..Default::default()
        }
    }

    fn with_stats(mut p: PlayerProfile, pvp: Option<PvpStats>, time_played: u64) -> PlayerProfile {
        p.stats = Some(EnardoStats {
            stats: StatSections {
                pvp,
                misc: Some(MiscStats { time_played }),
                ..Default::default()
            },
            ..Default::default()
        });
        p
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_split_reporter_and_targets() {
        let (reporter, targets) = split_reporter_and_targets(&ids(&["a", "b", "a", "c"]), true);
        assert_eq!(reporter.as_deref(), Some("a"));
        assert_eq!(targets, ids(&["b", "c"]));

        let (reporter, targets) = split_reporter_and_targets(&ids(&["a", "b"]), false);
        assert_eq!(reporter.as_deref(), Some("a"));
        assert!(targets.is_empty());

        let (reporter, targets) = split_reporter_and_targets(&[], true);
        assert!(reporter.is_none());
        assert!(targets.is_empty());
    }

    #[test]
    fn test_targets_are_capped() {
        let many = ids(&["r", "1", "2", "3", "4", "5", "6", "7"]);
        let (_, targets) = split_reporter_and_targets(&many, true);
        assert_eq!(targets.len(), MAX_REPORT_TARGETS);
        assert_eq!(targets[0], "1");
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_days_ago(0), "today");
        assert_eq!(format_days_ago(1), "1 day ago");
        assert_eq!(format_days_ago(12), "12 days ago");
        assert_eq!(format_server_time(59), "0m");
        assert_eq!(format_server_time(1500), "25m");
        assert_eq!(format_server_time(3 * 3600 + 25 * 60), "3h 25m");
    }

    #[test]
    fn test_rust_playtime_text() {
        let mut p = profile("1");
        assert_eq!(rust_playtime_text(&p), "N/A");
        p.rust_hours = Some(420);
        assert_eq!(rust_playtime_text(&p), "420 hrs");

        let hidden = with_stats(PlayerProfile { rust_hours: Some(0), ..profile("1") }, None, 600);
        assert_eq!(rust_playtime_text(&hidden), "Private / Not Visible");

        let new_player = PlayerProfile { rust_hours: Some(0), ..profile("1") };
        assert_eq!(rust_playtime_text(&new_player), "0 hrs");
    }

    #[test]
    fn test_pvp_line() {
        assert_eq!(pvp_line(&profile("1")), "PvP: No PvP data logged");

        let pvp = |kills, deaths| PvpStats { kills, deaths, ..Default::default() };
        let line = |kills, deaths| pvp_line(&with_stats(profile("1"), Some(pvp(kills, deaths)), 0));
        assert_eq!(line(10, 4), "Stats: K: 10 | D: 4 | K/D: 2.50");
        assert_eq!(line(7, 0), "Stats: K: 7 | D: 0 | K/D: 7.00");
        assert_eq!(line(0, 3), "Stats: K: 0 | D: 3 | K/D: N/A");
    }

    #[test]
    fn test_ban_line() {
        let mut p = profile("1");
        assert_eq!(ban_line(&p), "Bans: VAC: 0, Game: 0");

        p.vac_bans = Some(1);
        p.game_bans = Some(0);
        assert_eq!(ban_line(&p), "Bans: VAC: 1, Game: 0");

        p.days_since_last_ban = Some(45);
        assert_eq!(ban_line(&p), "Bans: VAC: 1, Game: 0 (last ban 45 days ago)");
    }

    #[test]
    fn test_profile_block_layout() {
        let p = with_stats(
            PlayerProfile { rust_hours: Some(100), ..profile("76561198000000001") },
            None,
            7200,
        );
        let block = profile_block(&p);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "Steam: Rusty");
        assert_eq!(lines[1], "SteamID64: `76561198000000001`");
        assert_eq!(lines[2], "Rust Playtime: 100 hrs");
        assert_eq!(lines[3], "Server Playtime: 2h 0m");
        assert_eq!(lines[4], "PvP: No PvP data logged");
        assert!(lines[6].starts_with("Links: [Steam Profile](https://steamcommunity.com/profiles/"));
        assert!(lines[6].contains("[BattleMetrics](https://www.battlemetrics.com/"));
    }

    #[test]
    fn test_reporter_and_target_fields() {
        let fields = reporter_fields(&profile("1"), true);
        assert_eq!(fields[0].0, "===== REPORTER =====");
        let fields = reporter_fields(&profile("1"), false);
        assert_eq!(fields[0].0, "===== INFORMATION =====");
        assert_eq!(fields.len(), 2);

        assert!(target_fields(&[]).is_empty());
        let fields = target_fields(&[profile("1"), profile("2")]);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].0, "===== TARGETS =====");
        assert!(fields[2].1.starts_with("**Target 2**\nSteam: Rusty"));
        assert!(fields.iter().all(|(name, value, _)| !name.is_empty() && !value.is_empty()));
    }

    #[test]
    fn test_admin_overview_embed() {
        let ticket = TicketContext {
            channel_name: "report-42".to_string(),
            channel_id: 99,
            creator_tag: "player#0001".to_string(),
            creator_id: 7,
        };
        assert!(admin_overview_embed(&ticket, None, &[]).is_none());

        let reporter = profile("1");
        let embed = admin_overview_embed(&ticket, Some(&reporter), &[profile("2")]).unwrap();
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["title"], "Ticket Steam Overview");
        assert_eq!(json["fields"].as_array().unwrap().len(), 4);
        assert_eq!(json["fields"][0]["name"], "===== REPORTER =====");
    }

    #[test]
    fn test_inventory_embed_has_one_field_per_block() {
        let blocks = vec![
            DisplayBlock::new("Active Products", vec!["VIP | 10x [Monthly]".to_string()]),
            DisplayBlock::new("PayNow", vec!["[Customer Page](https://dashboard.paynow.gg/customers/c1)".to_string()]),
        ];
        let json = serde_json::to_value(inventory_embed("76561198000000001", &blocks)).unwrap();
        let fields = json["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["name"], "Active Products");
        assert_eq!(fields[0]["value"], "VIP | 10x [Monthly]");
    }
}
