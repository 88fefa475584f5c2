//! PayNow store integration
//!
//! Slug parsing and inventory rendering are pure and synchronous; the client module holds
//! the only network access.

mod client;
mod inventory;
mod slug;

#[cfg(test)]
pub use client::MockCommerceApi;
pub use client::{
    CommerceApi, Customer, CustomerInventory, DELIVERY_ITEMS_LIMIT, PayNowClient,
    fetch_customer_inventory,
};
pub use inventory::{
    ACTIVE_TITLE, CUSTOMER_LINK_TITLE, ClassificationResult, DeliveryItem, DisplayBlock,
    EMPTY_BODY, EMPTY_TITLE, EXPIRED_TITLE, InventoryFormatter, ItemStatus, MAX_BLOCK_LEN,
    ProductRef, classify, classify_at, customer_link_block, format_expiry_label,
    format_expiry_label_at, paginate, split, split_at,
};
pub use slug::{GLOBAL_SERVER, SlugDescriptor, SlugKind, SlugParser, UNKNOWN_PRODUCT};
