//! Delivery item classification and inventory rendering
//!
//! Items are split into active and expired buckets, rendered into one line each and packed
//! into size-bounded display blocks that map onto Discord embed fields.

use crate::paynow::slug::{SlugDescriptor, SlugKind, SlugParser, capitalize};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Longest body a display block may carry (Discord embed field value limit)
pub const MAX_BLOCK_LEN: usize = 1024;

pub const ACTIVE_TITLE: &str = "Active Products";
pub const EXPIRED_TITLE: &str = "Recently Expired";
pub const EMPTY_TITLE: &str = "Inventory";
pub const EMPTY_BODY: &str = "No products found for this customer.";
pub const CUSTOMER_LINK_TITLE: &str = "PayNow";
pub const CUSTOMER_DASHBOARD_URL: &str = "https://dashboard.paynow.gg/customers";

const USABLE_STATE: &str = "usable";
const MS_PER_DAY: f64 = 86_400_000.0;

/// Product reference embedded in a delivery item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRef {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// One entitlement granted to a customer, as reported by PayNow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryItem {
    pub state: Option<String>,
    pub expires_at: Option<String>,
    pub override_expires_at: Option<String>,
    pub revoked_at: Option<String>,
    pub removed_at: Option<String>,
    pub expirable: bool,
    pub product: ProductRef,
}

impl DeliveryItem {
    /// Read an item from loosely-shaped JSON. Returns `None` for non-objects.
    ///
    /// Missing or mistyped fields fall back to their defaults instead of failing.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
        let product = object.get("product");

        Some(Self {
            state: text(object.get("state")),
            expires_at: text(object.get("expires_at")),
            override_expires_at: text(object.get("override_expires_at")),
            revoked_at: text(object.get("revoked_at")),
            removed_at: text(object.get("removed_at")),
            expirable: object
                .get("expirable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            product: ProductRef {
                id: text(product.and_then(|p| p.get("id"))),
                slug: text(product.and_then(|p| p.get("slug"))),
                name: text(product.and_then(|p| p.get("name"))),
            },
        })
    }

    /// Slug used for display, falling back to the product id
    #[must_use]
    pub fn product_slug(&self) -> Option<&str> {
        self.product
            .slug
            .as_deref()
            .or(self.product.id.as_deref())
    }

    /// Override expiry wins over the standard one
    #[must_use]
    pub fn effective_expiry(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.override_expires_at.as_deref())
            .or_else(|| parse_timestamp(self.expires_at.as_deref()))
    }

    /// Most specific timestamp for the expiry label
    #[must_use]
    pub fn label_timestamp(&self) -> Option<DateTime<Utc>> {
        [
            &self.override_expires_at,
            &self.expires_at,
            &self.revoked_at,
            &self.removed_at,
        ]
        .into_iter()
        .find_map(|ts| parse_timestamp(ts.as_deref()))
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Bucket an item falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Active,
    Expired,
}

/// Active iff the state is `usable` and the item has not run past its expiry.
#[must_use]
pub fn classify_at(item: &DeliveryItem, now: DateTime<Utc>) -> ItemStatus {
    let usable = item
        .state
        .as_deref()
        .is_some_and(|state| state.trim().eq_ignore_ascii_case(USABLE_STATE));

    if !usable {
        return ItemStatus::Expired;
    }

    match item.effective_expiry() {
        Some(expiry) if expiry < now => ItemStatus::Expired,
        _ => ItemStatus::Active,
    }
}

#[must_use]
pub fn classify(item: &DeliveryItem) -> ItemStatus {
    classify_at(item, Utc::now())
}

/// Partition of a customer's items. Every input item lands in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub active_items: Vec<DeliveryItem>,
    pub expired_items: Vec<DeliveryItem>,
}

/// Split items into active and expired, keeping input order within each bucket.
#[must_use]
pub fn split_at(items: Vec<DeliveryItem>, now: DateTime<Utc>) -> ClassificationResult {
    let (active_items, expired_items) = items
        .into_iter()
        .partition(|item| classify_at(item, now) == ItemStatus::Active);

    ClassificationResult {
        active_items,
        expired_items,
    }
}

#[must_use]
pub fn split(items: Vec<DeliveryItem>) -> ClassificationResult {
    split_at(items, Utc::now())
}

/// Relative expiry text such as `Expires in 3 days` or `Expired 1 day ago`.
///
/// Without any timestamp the item is `lifetime`, or `expired` when `force_expired` is set.
#[must_use]
pub fn format_expiry_label_at(
    item: &DeliveryItem,
    force_expired: bool,
    now: DateTime<Utc>,
) -> String {
    let Some(timestamp) = item.label_timestamp() else {
        let label = if force_expired { "expired" } else { "lifetime" };
        return label.to_string();
    };

    let diff_ms = (timestamp - now).num_milliseconds();
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let days = ((diff_ms.unsigned_abs() as f64) / MS_PER_DAY).round() as u64;

    if diff_ms < 0 || force_expired {
        match days {
            0 => "Expired today".to_string(),
            1 => "Expired 1 day ago".to_string(),
            n => format!("Expired {n} days ago"),
        }
    } else {
        match days {
            0 => "Expires today".to_string(),
            1 => "Expires in 1 day".to_string(),
            n => format!("Expires in {n} days"),
        }
    }
}

#[must_use]
pub fn format_expiry_label(item: &DeliveryItem, force_expired: bool) -> String {
    format_expiry_label_at(item, force_expired, Utc::now())
}

/// A titled chunk of lines whose joined body fits in [`MAX_BLOCK_LEN`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBlock {
    pub title: String,
    pub lines: Vec<String>,
}

impl DisplayBlock {
    #[must_use]
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    /// Lines joined with newlines
    #[must_use]
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// Body length in characters
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum::<usize>()
            + self.lines.len().saturating_sub(1)
    }
}

/// Greedily pack lines into blocks titled `title`, `title (2)`, `title (3)`, ...
///
/// A single line longer than the limit gets a block of its own and is not wrapped.
#[must_use]
pub fn paginate(title: &str, lines: Vec<String>) -> Vec<DisplayBlock> {
    let mut blocks: Vec<DisplayBlock> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0usize;

    let page_title = |index: usize| {
        if index == 0 {
            title.to_string()
        } else {
            format!("{title} ({})", index + 1)
        }
    };

    for line in lines {
        let line_len = line.chars().count();
        if !current.is_empty() && current_len + line_len + 1 > MAX_BLOCK_LEN {
            blocks.push(DisplayBlock::new(
                page_title(blocks.len()),
                std::mem::take(&mut current),
            ));
            current_len = 0;
        }

        current_len += if current.is_empty() { line_len } else { line_len + 1 };
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(DisplayBlock::new(page_title(blocks.len()), current));
    }

    blocks
}

/// Link block pointing at the customer's PayNow dashboard page
#[must_use]
pub fn customer_link_block(customer_id: &str) -> DisplayBlock {
    DisplayBlock::new(
        CUSTOMER_LINK_TITLE,
        vec![format!(
            "[Customer Page]({CUSTOMER_DASHBOARD_URL}/{customer_id})"
        )],
    )
}

/// Renders classified items into display blocks
#[derive(Debug, Clone, Copy)]
pub struct InventoryFormatter<'a> {
    parser: SlugParser<'a>,
    max_expired_items: usize,
}

impl<'a> InventoryFormatter<'a> {
    #[must_use]
    pub fn new(parser: SlugParser<'a>, max_expired_items: usize) -> Self {
        Self {
            parser,
            max_expired_items,
        }
    }

    #[must_use]
    pub fn describe(&self, item: &DeliveryItem) -> SlugDescriptor {
        self.parser.parse(item.product_slug())
    }

    /// Credits, tags, name colours and permanent products aren't worth listing as expired.
    #[must_use]
    pub fn should_exclude_from_expired(&self, item: &DeliveryItem) -> bool {
        let descriptor = self.describe(item);
        match descriptor.kind {
            SlugKind::Credits | SlugKind::Tag | SlugKind::NameColor => true,
            SlugKind::Generic => descriptor
                .runtime_text
                .as_deref()
                .is_some_and(|runtime| runtime.eq_ignore_ascii_case("permanent")),
        }
    }

    /// `{product} | {server}` with a `[runtime]` suffix for generic products
    #[must_use]
    pub fn item_line(&self, item: &DeliveryItem) -> String {
        let descriptor = self.describe(item);
        let mut line = format!("{} | {}", descriptor.product_name, descriptor.server_name);
        if let Some(runtime) = descriptor.display_runtime() {
            line.push_str(&format!(" [{runtime}]"));
        }
        line
    }

    /// Expired items that survive exclusion, capped at the configured limit
    #[must_use]
    pub fn visible_expired<'i>(&self, expired_items: &'i [DeliveryItem]) -> Vec<&'i DeliveryItem> {
        expired_items
            .iter()
            .filter(|item| !self.should_exclude_from_expired(item))
            .take(self.max_expired_items)
            .collect()
    }

    #[must_use]
    pub fn build_display_blocks_at(
        &self,
        active_items: &[DeliveryItem],
        expired_items: &[DeliveryItem],
        now: DateTime<Utc>,
    ) -> Vec<DisplayBlock> {
        let active_lines: Vec<String> = active_items.iter().map(|i| self.item_line(i)).collect();

        let expired_lines: Vec<String> = self
            .visible_expired(expired_items)
            .into_iter()
            .map(|item| {
                let label = capitalize(&format_expiry_label_at(item, true, now));
                format!("{} — {label}", self.item_line(item))
            })
            .collect();

        if active_lines.is_empty() && expired_lines.is_empty() {
            return vec![DisplayBlock::new(EMPTY_TITLE, vec![EMPTY_BODY.to_string()])];
        }

        let mut blocks = paginate(ACTIVE_TITLE, active_lines);
        blocks.extend(paginate(EXPIRED_TITLE, expired_lines));
        blocks
    }

    #[must_use]
    pub fn build_display_blocks(
        &self,
        active_items: &[DeliveryItem],
        expired_items: &[DeliveryItem],
    ) -> Vec<DisplayBlock> {
        self.build_display_blocks_at(active_items, expired_items, Utc::now())
    }

    /// Inventory blocks followed by the dashboard link when the customer is known
    #[must_use]
    pub fn build_inventory_blocks(
        &self,
        result: &ClassificationResult,
        customer_id: Option<&str>,
    ) -> Vec<DisplayBlock> {
        let mut blocks = self.build_display_blocks(&result.active_items, &result.expired_items);
        if let Some(id) = customer_id.filter(|id| !id.is_empty()) {
            blocks.push(customer_link_block(id));
        }
        blocks
    }
}
