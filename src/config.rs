//! Runtime configuration
//!
//! `BotConfig` is read once at startup and shared through [`crate::Data`]. The slug
//! vocabulary is operator-editable YAML so new server names or product words can be added
//! without touching code.

use crate::error::{BotError, BotResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_PAYNOW_BASE_URL: &str = "https://api.paynow.gg";
pub const DEFAULT_PAYNOW_STORE_ID: &str = "304676382217084928";
pub const DEFAULT_ENARDO_API_BASE: &str = "https://enardo.gg";
pub const DEFAULT_MAX_EXPIRED_ITEMS: usize = 3;
pub const DEFAULT_VOCABULARY_FILE: &str = "config/slug_vocabulary.yaml";

/// Process-wide bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token
    pub discord_token: String,
    /// PayNow management key, already in `APIKey <token>` form
    pub paynow_api_key: Option<String>,
    pub paynow_store_id: String,
    pub paynow_base_url: String,
    /// How many recently expired products the inventory view shows
    pub max_expired_items: usize,
    pub steam_api_key: Option<String>,
    pub enardo_api_base: String,
    pub vocabulary_file: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            paynow_api_key: None,
            paynow_store_id: DEFAULT_PAYNOW_STORE_ID.to_string(),
            paynow_base_url: DEFAULT_PAYNOW_BASE_URL.to_string(),
            max_expired_items: DEFAULT_MAX_EXPIRED_ITEMS,
            steam_api_key: None,
            enardo_api_base: DEFAULT_ENARDO_API_BASE.to_string(),
            vocabulary_file: DEFAULT_VOCABULARY_FILE.to_string(),
        }
    }
}

impl BotConfig {
    /// Build the configuration from the process environment (after loading `.env`)
    ///
    /// # Errors
    /// Returns `BotError::Config` if `DISCORD_TOKEN` is missing.
    pub fn from_env() -> BotResult<Self> {
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns `BotError::Config` if `DISCORD_TOKEN` is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let discord_token = non_empty("DISCORD_TOKEN")
            .ok_or_else(|| BotError::Config("DISCORD_TOKEN must be set".to_string()))?;

        let defaults = Self::default();
        let config = Self {
            discord_token,
            paynow_api_key: non_empty("PAYNOW_API_KEY"),
            paynow_store_id: non_empty("PAYNOW_STORE_ID").unwrap_or(defaults.paynow_store_id),
            paynow_base_url: non_empty("PAYNOW_BASE_URL")
                .map_or(defaults.paynow_base_url, |url| trim_base_url(&url)),
            max_expired_items: non_empty("PAYNOW_MAX_EXPIRED")
                .map_or(DEFAULT_MAX_EXPIRED_ITEMS, |raw| parse_max_expired(&raw)),
            steam_api_key: non_empty("STEAM_API_KEY"),
            enardo_api_base: non_empty("ENARDO_API_BASE")
                .map_or(defaults.enardo_api_base, |url| trim_base_url(&url)),
            vocabulary_file: non_empty("SLUG_VOCABULARY_FILE").unwrap_or(defaults.vocabulary_file),
        };

        if config.paynow_api_key.is_none() {
            warn!("PAYNOW_API_KEY is not set, inventory lookups are disabled");
        }
        if config.steam_api_key.is_none() {
            warn!("STEAM_API_KEY is not set, Steam lookups are disabled");
        }

        Ok(config)
    }
}

/// Zero or garbage falls back to the default cap.
fn parse_max_expired(raw: &str) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => DEFAULT_MAX_EXPIRED_ITEMS,
        Ok(n) => n,
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Lookup tables used by the slug parser
///
/// Keys are matched against lower-cased slug tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugVocabulary {
    /// Server token -> display name
    #[serde(default)]
    pub servers: HashMap<String, String>,
    /// Word token -> display replacement
    #[serde(default)]
    pub words: HashMap<String, String>,
}

impl Default for SlugVocabulary {
    fn default() -> Self {
        let servers = [
            ("global", "Global"),
            ("main", "Main"),
            ("2x", "2x"),
            ("3x", "3x"),
            ("5x", "5x"),
            ("10x", "10x"),
            ("100x", "100x"),
            ("1000x", "1000x"),
            ("solo", "Solo"),
            ("duo", "Duo"),
            ("trio", "Trio"),
            ("quad", "Quad"),
            ("vanilla", "Vanilla"),
        ];
        let words = [
            ("vip", "VIP"),
            ("mvp", "MVP"),
            ("gg", "GG"),
            ("og", "OG"),
            ("rf", "Random Farming"),
            ("pvp", "PvP"),
            ("pve", "PvE"),
            ("kos", "KOS"),
            ("xp", "XP"),
            ("tc", "TC"),
        ];

        Self {
            servers: servers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            words: words
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SlugVocabulary {
    /// Parse a vocabulary from YAML, normalising keys to lower case
    ///
    /// # Errors
    /// Returns `BotError::Yaml` if the document is not a valid vocabulary.
    pub fn from_yaml(yaml: &str) -> BotResult<Self> {
        let parsed: Self = serde_yaml::from_str(yaml)?;
        Ok(parsed.normalized())
    }

    /// Load the vocabulary file, falling back to the built-in tables if it does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> BotResult<Self> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let vocabulary = Self::from_yaml(&content)?;
                info!(
                    path = %path.display(),
                    servers = vocabulary.servers.len(),
                    words = vocabulary.words.len(),
                    "Loaded slug vocabulary"
                );
                Ok(vocabulary)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No slug vocabulary file, using built-in tables");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[must_use]
    pub fn server(&self, token: &str) -> Option<&str> {
        self.servers.get(token).map(String::as_str)
    }

    #[must_use]
    pub fn word(&self, token: &str) -> Option<&str> {
        self.words.get(token).map(String::as_str)
    }

    fn normalized(self) -> Self {
        let lower = |map: HashMap<String, String>| {
            map.into_iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v))
                .collect()
        };
        Self {
            servers: lower(self.servers),
            words: lower(self.words),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_requires_discord_token() {
        let result = BotConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(BotError::Config(_))));

        let result = BotConfig::from_lookup(lookup_from(&[("DISCORD_TOKEN", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert!(config.paynow_api_key.is_none());
        assert!(config.steam_api_key.is_none());
        assert_eq!(config.paynow_store_id, DEFAULT_PAYNOW_STORE_ID);
        assert_eq!(config.paynow_base_url, DEFAULT_PAYNOW_BASE_URL);
        assert_eq!(config.enardo_api_base, DEFAULT_ENARDO_API_BASE);
        assert_eq!(config.max_expired_items, 3);
        assert_eq!(config.vocabulary_file, DEFAULT_VOCABULARY_FILE);
    }

    #[test]
    fn test_config_overrides() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("PAYNOW_API_KEY", "APIKey secret"),
            ("PAYNOW_MAX_EXPIRED", "7"),
            ("ENARDO_API_BASE", "https://stats.example.com///"),
            ("STEAM_API_KEY", "steam"),
        ]))
        .unwrap();
        assert_eq!(config.paynow_api_key.as_deref(), Some("APIKey secret"));
        assert_eq!(config.max_expired_items, 7);
        assert_eq!(config.enardo_api_base, "https://stats.example.com");
        assert_eq!(config.steam_api_key.as_deref(), Some("steam"));
    }

    #[test]
    fn test_max_expired_falls_back_on_bad_values() {
        assert_eq!(parse_max_expired("0"), 3);
        assert_eq!(parse_max_expired("lots"), 3);
        assert_eq!(parse_max_expired("-2"), 3);
        assert_eq!(parse_max_expired(" 5 "), 5);
    }

    #[test]
    fn test_vocabulary_from_yaml_lowercases_keys() {
        let yaml = "servers:\n  EU-Main: EU Main\nwords:\n  VIP: V.I.P.\n";
        let vocabulary = SlugVocabulary::from_yaml(yaml).unwrap();
        assert_eq!(vocabulary.server("eu-main"), Some("EU Main"));
        assert_eq!(vocabulary.word("vip"), Some("V.I.P."));
        assert_eq!(vocabulary.word("VIP"), None);
    }

    #[test]
    fn test_vocabulary_sections_are_optional() {
        let vocabulary = SlugVocabulary::from_yaml("words:\n  gg: GG\n").unwrap();
        assert!(vocabulary.servers.is_empty());
        assert_eq!(vocabulary.word("gg"), Some("GG"));
    }

    #[test]
    fn test_vocabulary_rejects_malformed_yaml() {
        let result = SlugVocabulary::from_yaml("servers: [not, a, map]");
        assert!(matches!(result, Err(BotError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_vocabulary_missing_file_uses_defaults() {
        let vocabulary = SlugVocabulary::load("does/not/exist.yaml").await.unwrap();
        assert_eq!(vocabulary, SlugVocabulary::default());
        assert_eq!(vocabulary.server("10x"), Some("10x"));
        assert_eq!(vocabulary.word("gg"), Some("GG"));
    }

    #[test]
    fn test_shipped_vocabulary_matches_defaults() {
        let shipped = SlugVocabulary::from_yaml(include_str!("../config/slug_vocabulary.yaml"))
            .unwrap();
        assert_eq!(shipped, SlugVocabulary::default());
    }
}
