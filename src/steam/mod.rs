//! Steam and Enardo player lookups

mod client;
mod enardo;
mod ids;
mod profile;

#[cfg(test)]
pub use client::MockSteamApi;
pub use client::{PlayerBans, PlayerSummary, RUST_APP_ID, SteamApi, SteamClient};
#[cfg(test)]
pub use enardo::MockStatsApi;
pub use enardo::{EnardoClient, EnardoStats, MiscStats, PvpStats, StatSections, StatsApi};
pub use ids::{extract_steam_ids, is_steam64, profile_url, steam32_to_steam64};
pub use profile::{
    PlayerProfile, UNKNOWN_PLAYER, battlemetrics_url, full_player_profile, resolve_to_steam64,
};
