use std::{ops::Deref, sync::Arc, time::Duration};

use crate::HTTP_TARGET;
use crate::config::{BotConfig, SlugVocabulary};
use crate::error::BotResult;
use crate::paynow::{
    CommerceApi, DisplayBlock, InventoryFormatter, PayNowClient, SlugParser,
    fetch_customer_inventory,
};
use crate::report::split_reporter_and_targets;
use crate::steam::{
    EnardoClient, PlayerProfile, StatsApi, SteamApi, SteamClient, full_player_profile,
    resolve_to_steam64,
};
use poise::serenity_prelude::prelude::TypeMapKey;
use tracing::debug;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("support-ticket-bot/", env!("CARGO_PKG_VERSION"));

/// Shared state handed to every command
#[derive(Clone)]
pub struct Data(pub Arc<DataInner>);

impl TypeMapKey for Data {
    type Value = Data;
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("paynow_enabled", &self.paynow.is_some())
            .field("max_expired_items", &self.config.max_expired_items)
            .field("servers", &self.vocabulary.servers.len())
            .field("words", &self.vocabulary.words.len())
            .finish_non_exhaustive()
    }
}

impl Deref for Data {
    type Target = DataInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct DataInner {
    pub config: BotConfig,
    pub vocabulary: SlugVocabulary,
    /// `None` when no PayNow key is configured
    pub paynow: Option<Arc<dyn CommerceApi>>,
    pub steam: Arc<dyn SteamApi>,
    pub stats: Arc<dyn StatsApi>,
}

impl Data {
    /// Build the real API clients around one shared HTTP connection pool
    ///
    /// # Errors
    /// Returns `BotError::Http` if the HTTP client cannot be built.
    pub fn new(config: BotConfig, vocabulary: SlugVocabulary) -> BotResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        let paynow = PayNowClient::from_config(http.clone(), &config)
            .map(|client| Arc::new(client) as Arc<dyn CommerceApi>);
        let steam = Arc::new(SteamClient::new(http.clone(), config.steam_api_key.clone()));
        let stats = Arc::new(EnardoClient::new(http, &config.enardo_api_base));

        Ok(Self::with_apis(config, vocabulary, paynow, steam, stats))
    }

    #[must_use]
    pub fn with_apis(
        config: BotConfig,
        vocabulary: SlugVocabulary,
        paynow: Option<Arc<dyn CommerceApi>>,
        steam: Arc<dyn SteamApi>,
        stats: Arc<dyn StatsApi>,
    ) -> Self {
        Self(Arc::new(DataInner {
            config,
            vocabulary,
            paynow,
            steam,
            stats,
        }))
    }

    #[must_use]
    pub fn slug_parser(&self) -> SlugParser<'_> {
        SlugParser::new(&self.vocabulary)
    }

    #[must_use]
    pub fn inventory_formatter(&self) -> InventoryFormatter<'_> {
        InventoryFormatter::new(self.slug_parser(), self.config.max_expired_items)
    }

    /// Resolve a raw Steam id or vanity name to a SteamID64
    pub async fn resolve_steam64(&self, raw_id: &str) -> Option<String> {
        resolve_to_steam64(self.steam.as_ref(), raw_id).await
    }

    pub async fn player_profile(&self, raw_id: &str) -> Option<PlayerProfile> {
        full_player_profile(self.steam.as_ref(), self.stats.as_ref(), raw_id).await
    }

    /// Profiles for the ids found in a ticket: the creator first, then reported players.
    ///
    /// Ids that can't be resolved are dropped.
    pub async fn ticket_profiles(
        &self,
        ids: &[String],
        is_report: bool,
    ) -> (Option<PlayerProfile>, Vec<PlayerProfile>) {
        let (reporter_id, target_ids) = split_reporter_and_targets(ids, is_report);

        let reporter = match reporter_id {
            Some(id) => self.player_profile(&id).await,
            None => None,
        };
        let mut targets = Vec::with_capacity(target_ids.len());
        for id in &target_ids {
            if let Some(profile) = self.player_profile(id).await {
                targets.push(profile);
            }
        }
        (reporter, targets)
    }

    /// Inventory display blocks for a SteamID64.
    ///
    /// `None` when PayNow is disabled or the player is not a customer.
    pub async fn inventory_blocks(&self, steam64: &str) -> Option<Vec<DisplayBlock>> {
        let Some(paynow) = self.paynow.as_deref() else {
            debug!(target: HTTP_TARGET, "PayNow disabled, skipping inventory lookup");
            return None;
        };
        let inventory = fetch_customer_inventory(paynow, steam64).await?;
        Some(
            self.inventory_formatter()
                .build_inventory_blocks(&inventory.items, Some(&inventory.customer_id)),
        )
    }
}
