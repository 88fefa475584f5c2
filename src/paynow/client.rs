//! PayNow Management API client
//!
//! Only the two read calls the inventory view needs: customer lookup by SteamID64 and
//! the customer's delivery items.

use crate::HTTP_TARGET;
use crate::config::BotConfig;
use crate::error::{BotError, BotResult};
use crate::paynow::inventory::{ClassificationResult, DeliveryItem, split};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Page size for the delivery items request
pub const DELIVERY_ITEMS_LIMIT: u32 = 100;

/// Subset of the PayNow customer object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub steam_id: Option<String>,
}

/// Read access to the commerce backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Find the customer linked to a SteamID64
    async fn lookup_customer_by_steam_id(&self, steam_id: &str) -> BotResult<Option<Customer>>;

    /// All delivery items of a customer, newest first
    async fn customer_delivery_items(&self, customer_id: &str) -> BotResult<Vec<DeliveryItem>>;
}

/// HTTP implementation of [`CommerceApi`]
#[derive(Debug, Clone)]
pub struct PayNowClient {
    http: reqwest::Client,
    api_key: String,
    store_id: String,
    base_url: String,
}

impl PayNowClient {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        store_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            store_id: store_id.into(),
            base_url: base_url.into(),
        }
    }

    /// Build a client when an API key is configured
    #[must_use]
    pub fn from_config(http: reqwest::Client, config: &BotConfig) -> Option<Self> {
        let api_key = config.paynow_api_key.as_ref()?;
        Some(Self::new(
            http,
            api_key.clone(),
            config.paynow_store_id.clone(),
            config.paynow_base_url.clone(),
        ))
    }

    fn customers_url(&self) -> String {
        format!("{}/v1/stores/{}/customers", self.base_url, self.store_id)
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> BotResult<Value> {
        debug!(target: HTTP_TARGET, url = %url, "PayNow request");
        let response = self
            .http
            .get(url)
            .query(query)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl CommerceApi for PayNowClient {
    async fn lookup_customer_by_steam_id(&self, steam_id: &str) -> BotResult<Option<Customer>> {
        if steam_id.is_empty() {
            return Ok(None);
        }
        let url = format!("{}/lookup", self.customers_url());
        let body = self
            .get_json(&url, &[("steam_id", steam_id.to_string())])
            .await?;
        Ok(parse_customer(body))
    }

    async fn customer_delivery_items(&self, customer_id: &str) -> BotResult<Vec<DeliveryItem>> {
        if customer_id.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/{customer_id}/delivery/items", self.customers_url());
        let body = self
            .get_json(
                &url,
                &[
                    ("limit", DELIVERY_ITEMS_LIMIT.to_string()),
                    ("asc", "false".to_string()),
                ],
            )
            .await?;
        parse_delivery_items(&body)
    }
}

/// A body without a usable `id` means "no such customer"
fn parse_customer(body: Value) -> Option<Customer> {
    serde_json::from_value::<Customer>(body)
        .ok()
        .filter(|customer| !customer.id.is_empty())
}

fn parse_delivery_items(body: &Value) -> BotResult<Vec<DeliveryItem>> {
    let Some(entries) = body.as_array() else {
        return Err(BotError::UnexpectedResponse(
            "delivery items response is not an array".to_string(),
        ));
    };
    Ok(entries.iter().filter_map(DeliveryItem::from_json).collect())
}

/// A customer's inventory, already split for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInventory {
    pub customer_id: String,
    pub items: ClassificationResult,
}

/// Look up the customer for a SteamID64 and split their delivery items.
///
/// Remote failures are logged and treated like missing data: an unknown customer gives
/// `None`, a failed item fetch gives an empty inventory.
pub async fn fetch_customer_inventory(
    api: &dyn CommerceApi,
    steam_id: &str,
) -> Option<CustomerInventory> {
    if steam_id.is_empty() {
        return None;
    }

    let customer = match api.lookup_customer_by_steam_id(steam_id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => {
            debug!(target: HTTP_TARGET, steam_id = %steam_id, "No PayNow customer for SteamID");
            return None;
        }
        Err(e) => {
            warn!(target: HTTP_TARGET, steam_id = %steam_id, error = %e, "PayNow customer lookup failed");
            return None;
        }
    };

    let items = api
        .customer_delivery_items(&customer.id)
        .await
        .unwrap_or_else(|e| {
            warn!(
                target: HTTP_TARGET,
                customer_id = %customer.id,
                error = %e,
                "PayNow delivery items fetch failed"
            );
            Vec::new()
        });

    Some(CustomerInventory {
        customer_id: customer.id,
        items: split(items),
    })
}
