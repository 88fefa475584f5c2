//! Steam Web API client

use crate::HTTP_TARGET;
use crate::error::BotResult;
use crate::steam::ids::is_steam64;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const STEAM_API_BASE: &str = "https://api.steampowered.com";
/// Rust's Steam app id
pub const RUST_APP_ID: u64 = 252_490;

/// `GetPlayerSummaries` player entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerSummary {
    pub steamid: String,
    #[serde(default)]
    pub personaname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub avatarfull: Option<String>,
}

/// `GetPlayerBans` player entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerBans {
    #[serde(default)]
    pub community_banned: bool,
    #[serde(rename = "NumberOfVACBans", default)]
    pub number_of_vac_bans: u32,
    #[serde(default)]
    pub number_of_game_bans: u32,
    #[serde(default)]
    pub days_since_last_ban: u32,
    #[serde(default)]
    pub economy_ban: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResolveVanityEnvelope {
    response: ResolveVanityResponse,
}

#[derive(Debug, Deserialize)]
struct ResolveVanityResponse {
    success: i32,
    #[serde(default)]
    steamid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummariesEnvelope {
    response: SummariesResponse,
}

#[derive(Debug, Deserialize)]
struct SummariesResponse {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct BansEnvelope {
    #[serde(default)]
    players: Vec<PlayerBans>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesEnvelope {
    response: OwnedGamesResponse,
}

#[derive(Debug, Default, Deserialize)]
struct OwnedGamesResponse {
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u64,
    #[serde(default)]
    playtime_forever: u64,
}

/// Player lookups on the Steam Web API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// Resolve a vanity name to a SteamID64
    async fn resolve_vanity(&self, vanity: &str) -> BotResult<Option<String>>;

    async fn player_summary(&self, steam64: &str) -> BotResult<Option<PlayerSummary>>;

    async fn player_bans(&self, steam64: &str) -> BotResult<Option<PlayerBans>>;

    /// Hours of Rust played, 0 when the game isn't visible in the library
    async fn rust_hours(&self, steam64: &str) -> BotResult<Option<u64>>;
}

/// HTTP implementation of [`SteamApi`]
///
/// Vanity resolutions are cached for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    vanity_cache: Arc<DashMap<String, String>>,
}

impl SteamClient {
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self::with_base_url(http, api_key, STEAM_API_BASE)
    }

    #[must_use]
    pub fn with_base_url(
        http: reqwest::Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.into(),
            vanity_cache: Arc::new(DashMap::new()),
        }
    }

    /// Number of cached vanity resolutions
    #[must_use]
    pub fn cached_vanities(&self) -> usize {
        self.vanity_cache.len()
    }

    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> BotResult<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let Some(key) = self.api_key.as_deref() else {
            debug!(target: HTTP_TARGET, path = %path, "Steam API key missing, skipping request");
            return Ok(None);
        };

        let url = format!("{}/{path}", self.base_url);
        let mut params: Vec<(&str, &str)> = vec![("key", key)];
        params.extend_from_slice(query);

        let body = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(Some(body))
    }
}

#[async_trait]
impl SteamApi for SteamClient {
    async fn resolve_vanity(&self, vanity: &str) -> BotResult<Option<String>> {
        let key = vanity.to_lowercase();
        if let Some(cached) = self.vanity_cache.get(&key) {
            return Ok(Some(cached.value().clone()));
        }

        let envelope: Option<ResolveVanityEnvelope> = self
            .get("ISteamUser/ResolveVanityURL/v1/", &[("vanityurl", vanity)])
            .await?;

        let resolved = envelope
            .map(|e| e.response)
            .filter(|r| r.success == 1)
            .and_then(|r| r.steamid)
            .filter(|id| is_steam64(id));

        match &resolved {
            Some(steam64) => {
                self.vanity_cache.insert(key, steam64.clone());
            }
            None => warn!(target: HTTP_TARGET, vanity = %vanity, "Could not resolve vanity URL"),
        }
        Ok(resolved)
    }

    async fn player_summary(&self, steam64: &str) -> BotResult<Option<PlayerSummary>> {
        let envelope: Option<SummariesEnvelope> = self
            .get("ISteamUser/GetPlayerSummaries/v2/", &[("steamids", steam64)])
            .await?;
        Ok(envelope.and_then(|e| e.response.players.into_iter().next()))
    }

    async fn player_bans(&self, steam64: &str) -> BotResult<Option<PlayerBans>> {
        let envelope: Option<BansEnvelope> = self
            .get("ISteamUser/GetPlayerBans/v1/", &[("steamids", steam64)])
            .await?;
        Ok(envelope.and_then(|e| e.players.into_iter().next()))
    }

    async fn rust_hours(&self, steam64: &str) -> BotResult<Option<u64>> {
        let envelope: Option<OwnedGamesEnvelope> = self
            .get(
                "IPlayerService/GetOwnedGames/v1/",
                &[
                    ("steamid", steam64),
                    ("include_appinfo", "false"),
                    ("include_played_free_games", "1"),
                ],
            )
            .await?;
        Ok(envelope.map(|e| rust_hours_from_games(&e.response.games)))
    }
}

/// Rounded hours from `playtime_forever` minutes
fn rust_hours_from_games(games: &[OwnedGame]) -> u64 {
    games
        .iter()
        .find(|game| game.appid == RUST_APP_ID)
        .map_or(0, |game| (game.playtime_forever + 30) / 60)
}
