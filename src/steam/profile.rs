//! Combined player profile from Steam and Enardo

use crate::HTTP_TARGET;
use crate::error::BotResult;
use crate::steam::client::{PlayerBans, PlayerSummary, SteamApi};
use crate::steam::enardo::{EnardoStats, StatsApi};
use crate::steam::ids::{is_steam64, profile_url};
use std::fmt::Display;
use tracing::warn;

pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Everything the ticket overview shows about one player
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerProfile {
    pub steam_id: String,
    pub steam_name: String,
    pub avatar: Option<String>,
    pub profile_url: String,
    pub battlemetrics_url: String,
    pub rust_hours: Option<u64>,
    pub vac_bans: Option<u32>,
    pub game_bans: Option<u32>,
    pub days_since_last_ban: Option<u32>,
    pub community_banned: Option<bool>,
    pub economy_ban: Option<String>,
    pub stats: Option<EnardoStats>,
}

impl PlayerProfile {
    /// Assemble a profile from whatever lookups succeeded
    #[must_use]
    pub fn assemble(
        steam_id: &str,
        summary: Option<PlayerSummary>,
        bans: Option<PlayerBans>,
        rust_hours: Option<u64>,
        stats: Option<EnardoStats>,
    ) -> Self {
        let steam_name = summary
            .as_ref()
            .and_then(|s| s.personaname.clone())
            .or_else(|| stats.as_ref().and_then(|s| s.username.clone()))
            .unwrap_or_else(|| UNKNOWN_PLAYER.to_string());

        let avatar = summary
            .as_ref()
            .and_then(|s| s.avatarfull.clone().or_else(|| s.avatar.clone()))
            .or_else(|| stats.as_ref().and_then(|s| s.avatar.clone()));

        Self {
            steam_id: steam_id.to_string(),
            steam_name,
            avatar,
            profile_url: profile_url(steam_id),
            battlemetrics_url: battlemetrics_url(steam_id),
            rust_hours,
            vac_bans: bans.as_ref().map(|b| b.number_of_vac_bans),
            game_bans: bans.as_ref().map(|b| b.number_of_game_bans),
            days_since_last_ban: bans.as_ref().map(|b| b.days_since_last_ban),
            community_banned: bans.as_ref().map(|b| b.community_banned),
            economy_ban: bans.and_then(|b| b.economy_ban),
            stats,
        }
    }

    /// Server playtime in seconds from the stats site
    #[must_use]
    pub fn server_time(&self) -> Option<u64> {
        self.stats.as_ref().and_then(EnardoStats::server_time)
    }
}

/// BattleMetrics RCON player search for a SteamID64
#[must_use]
pub fn battlemetrics_url(steam64: &str) -> String {
    format!("https://www.battlemetrics.com/rcon/players?filter[search]={steam64}")
}

/// Turn a raw id (SteamID64 or vanity name) into a SteamID64
pub async fn resolve_to_steam64(steam: &dyn SteamApi, raw_id: &str) -> Option<String> {
    let raw_id = raw_id.trim();
    if raw_id.is_empty() {
        return None;
    }
    if is_steam64(raw_id) {
        return Some(raw_id.to_string());
    }
    logged(steam.resolve_vanity(raw_id).await, "resolve_vanity", raw_id).flatten()
}

/// Look up everything known about a player. `None` when the id can't be resolved.
///
/// The four lookups run concurrently; each failure only blanks its own part of the profile.
pub async fn full_player_profile(
    steam: &dyn SteamApi,
    stats: &dyn StatsApi,
    raw_id: &str,
) -> Option<PlayerProfile> {
    let steam64 = resolve_to_steam64(steam, raw_id).await?;

    let (summary, bans, hours, enardo) = tokio::join!(
        steam.player_summary(&steam64),
        steam.player_bans(&steam64),
        steam.rust_hours(&steam64),
        stats.discord_stats(&steam64),
    );

    Some(PlayerProfile::assemble(
        &steam64,
        logged(summary, "player_summary", &steam64).flatten(),
        logged(bans, "player_bans", &steam64).flatten(),
        logged(hours, "rust_hours", &steam64).flatten(),
        logged(enardo, "discord_stats", &steam64).flatten(),
    ))
}

fn logged<T>(result: BotResult<T>, call: &str, id: impl Display) -> Option<T> {
    result
        .inspect_err(|e| warn!(target: HTTP_TARGET, call = %call, id = %id, error = %e, "Lookup failed"))
        .ok()
}
