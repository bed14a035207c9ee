//! Persistence/transport collaborator contract
//!
//! The core treats storage and transport as a single external collaborator
//! behind this trait. Implementors must apply each patch as one atomic
//! statement so that two concurrent writes on the same order can never
//! partially interleave, and must enforce the set-once rule for
//! `payment_method` and `courier_name`.

use crate::error::AppResult;
use crate::models::{MenuItem, Order, OrderPatch, Settings, SettingsUpdate};
use async_trait::async_trait;

/// Default bound on `list_orders`
pub const ORDERS_LIMIT: usize = 300;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, most-recent-first, bounded (default last 300).
    async fn list_orders(&self) -> AppResult<Vec<Order>>;

    /// Persist a new order. Rejects on id collision.
    async fn create_order(&self, order: Order) -> AppResult<()>;

    /// Apply one recognized patch group atomically and return the updated
    /// order.
    async fn patch_order(&self, id: &str, patch: OrderPatch) -> AppResult<Order>;

    async fn list_menu(&self) -> AppResult<Vec<MenuItem>>;
    async fn upsert_menu_item(&self, item: MenuItem) -> AppResult<()>;
    async fn delete_menu_item(&self, id: &str) -> AppResult<()>;

    async fn get_settings(&self) -> AppResult<Settings>;
    async fn set_settings(&self, update: SettingsUpdate) -> AppResult<Settings>;
}
