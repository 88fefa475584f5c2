//! Enardo server stats API
//!
//! The stats site exposes `/api/discordstats?steamId=` with per-player PvP and playtime
//! sections. Sections are optional; anything missing is simply not shown.

use crate::HTTP_TARGET;
use crate::error::BotResult;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// PvP section of the stats payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PvpStats {
    #[serde(default)]
    pub kills: u64,
    #[serde(default)]
    pub deaths: u64,
    #[serde(default)]
    pub headshots: u64,
    #[serde(default)]
    pub bullets_fired: u64,
}

/// Miscellaneous section; only playtime is used
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MiscStats {
    /// Seconds played on the servers
    #[serde(default)]
    pub time_played: u64,
}

/// Stats sections by category
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatSections {
    #[serde(default)]
    pub pvp: Option<PvpStats>,
    #[serde(default)]
    pub misc: Option<MiscStats>,
    #[serde(default)]
    pub resources: Option<Value>,
    #[serde(default)]
    pub explosives: Option<Value>,
    #[serde(default)]
    pub farming: Option<Value>,
    #[serde(default)]
    pub events: Option<Value>,
}

/// `discordstats` response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnardoStats {
    #[serde(default, rename = "steamId")]
    pub steam_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub stats: StatSections,
}

impl EnardoStats {
    /// Server playtime in seconds, if any was logged
    #[must_use]
    pub fn server_time(&self) -> Option<u64> {
        self.stats
            .misc
            .as_ref()
            .map(|misc| misc.time_played)
            .filter(|seconds| *seconds > 0)
    }
}

/// Per-player server statistics
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn discord_stats(&self, steam64: &str) -> BotResult<Option<EnardoStats>>;
}

/// HTTP implementation of [`StatsApi`]
#[derive(Debug, Clone)]
pub struct EnardoClient {
    http: reqwest::Client,
    base_url: String,
}

impl EnardoClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn stats_url(&self) -> String {
        format!("{}/api/discordstats", self.base_url)
    }
}

#[async_trait]
impl StatsApi for EnardoClient {
    async fn discord_stats(&self, steam64: &str) -> BotResult<Option<EnardoStats>> {
        if steam64.is_empty() {
            return Ok(None);
        }
        debug!(target: HTTP_TARGET, steam_id = %steam64, "Enardo stats request");
        let body = self
            .http
            .get(self.stats_url())
            .query(&[("steamId", steam64)])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(parse_stats(body))
    }
}

/// Bodies carrying an `error` key mean "no stats for this player"
fn parse_stats(body: Value) -> Option<EnardoStats> {
    if !body.is_object() || body.get("error").is_some_and(|e| !e.is_null()) {
        return None;
    }
    serde_json::from_value(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_payload() {
        let stats = parse_stats(json!({
            "steamId": "76561198000000001",
            "username": "Rusty",
            "stats": {
                "pvp": { "kills": 120, "deaths": 40, "headshots": 33, "kd": 3.0 },
                "misc": { "time_played": 7200 },
                "events": { "heli_kills": 2 }
            }
        }))
        .unwrap();

        assert_eq!(stats.username.as_deref(), Some("Rusty"));
        let pvp = stats.stats.pvp.as_ref().unwrap();
        assert_eq!((pvp.kills, pvp.deaths, pvp.headshots), (120, 40, 33));
        assert_eq!(stats.server_time(), Some(7200));
        assert!(stats.stats.events.is_some());
        assert!(stats.stats.farming.is_none());
    }

    #[test]
    fn test_parse_error_and_garbage() {
        assert!(parse_stats(json!({ "error": "Player not found" })).is_none());
        assert!(parse_stats(json!([1, 2, 3])).is_none());
        assert!(parse_stats(json!({ "stats": { "pvp": "broken" } })).is_none());
    }

    #[test]
    fn test_server_time_ignores_zero() {
        let stats = parse_stats(json!({ "stats": { "misc": { "time_played": 0 } } })).unwrap();
        assert_eq!(stats.server_time(), None);
    }

    #[test]
    fn test_base_url_trailing_slashes() {
        let client = EnardoClient::new(reqwest::Client::new(), "https://enardo.gg//");
        assert_eq!(client.stats_url(), "https://enardo.gg/api/discordstats");
    }
}
