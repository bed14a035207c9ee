//! Order service
//!
//! The single entry point for every write intent. Each operation follows the
//! same shape: fetch the authoritative state from the store, let the
//! validator, state machine or decider produce one atomic patch, apply it
//! through the store contract. Client caches never feed a decision here.

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CartSubmission, MenuItem, Order, OrderStatus, PaymentMethod, Settings, SettingsUpdate,
    Snapshot,
};
use shared::store::OrderStore;
use shared::util;

use crate::config::CoreConfig;
use crate::decider::{self, SubmitDecision};
use crate::occupancy::OccupancyMap;
use crate::state_machine;
use crate::validator;

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    config: CoreConfig,
    /// Serializes the fetch-decide-write window of `submit` so two racing
    /// submissions for one table cannot both open a tab.
    submit_lock: Arc<tokio::sync::Mutex<()>>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, config: CoreConfig) -> Self {
        Self {
            store,
            config,
            submit_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Table count from settings, falling back to the configured default.
    async fn tables_count(&self) -> u32 {
        match self.store.get_settings().await {
            Ok(settings) => settings.tables_count,
            Err(err) => {
                tracing::warn!(%err, "settings unavailable, using configured table count");
                self.config.tables_count
            }
        }
    }

    async fn find_order(&self, id: &str) -> AppResult<Order> {
        let orders = self.store.list_orders().await?;
        orders
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order", id))
    }

    /// Submit a cart: append to the table's open tab or create a new order.
    ///
    /// The decision is made against a fetch performed inside this call, so a
    /// tab opened by a concurrent submission is appended to rather than
    /// duplicated. Returns the order as committed.
    pub async fn submit(&self, submission: CartSubmission) -> AppResult<Order> {
        let tables_count = self.tables_count().await;
        validator::validate_submission(&submission, tables_count)?;

        let _guard = self.submit_lock.lock().await;
        let orders = self.store.list_orders().await?;
        match decider::decide(&orders, submission) {
            SubmitDecision::Create(order) => {
                validator::validate_order(&order, tables_count)?;
                tracing::info!(order = %order.id, ?order.order_type, "creating order");
                self.store.create_order(order.clone()).await?;
                Ok(order)
            }
            SubmitDecision::Append { order_id, patch } => {
                tracing::info!(order = %order_id, "appending to open order");
                self.store.patch_order(&order_id, patch).await
            }
        }
    }

    /// Cashier settles an offline order.
    pub async fn confirm_offline_payment(
        &self,
        id: &str,
        method: PaymentMethod,
    ) -> AppResult<Order> {
        let order = self.find_order(id).await?;
        let patch = state_machine::confirm_offline_payment(&order, method)?;
        self.store.patch_order(id, patch).await
    }

    /// Customer attaches a transfer proof to an online order.
    pub async fn attach_payment_proof(&self, id: &str, proof: &str) -> AppResult<Order> {
        let order = self.find_order(id).await?;
        let patch = state_machine::attach_payment_proof(&order, proof)?;
        self.store.patch_order(id, patch).await
    }

    /// Cashier approves an online payment and assigns a courier.
    pub async fn approve_online_payment(&self, id: &str, courier_name: &str) -> AppResult<Order> {
        let order = self.find_order(id).await?;
        let patch = state_machine::approve_online_payment(&order, courier_name)?;
        self.store.patch_order(id, patch).await
    }

    /// Customer confirms receipt. Repeating the call is a no-op.
    pub async fn confirm_received(&self, id: &str) -> AppResult<Order> {
        let order = self.find_order(id).await?;
        match state_machine::confirm_received(&order)? {
            Some(patch) => self.store.patch_order(id, patch).await,
            None => Ok(order),
        }
    }

    /// Staff advances the operational status.
    pub async fn advance_status(&self, id: &str, to: OrderStatus) -> AppResult<Order> {
        let order = self.find_order(id).await?;
        let patch = state_machine::advance_status(&order, to)?;
        self.store.patch_order(id, patch).await
    }

    /// Cancel an order that is still unpaid and not served.
    pub async fn cancel(&self, id: &str) -> AppResult<Order> {
        self.advance_status(id, OrderStatus::Cancelled).await
    }

    /// Derive current table occupancy from a fresh snapshot.
    pub async fn occupancy(&self) -> AppResult<OccupancyMap> {
        let tables_count = self.tables_count().await;
        let orders = self.store.list_orders().await?;
        Ok(OccupancyMap::resolve(&orders, tables_count))
    }

    /// Full snapshot for a polling client, bounded by the configured order
    /// limit.
    pub async fn snapshot(&self) -> AppResult<Snapshot> {
        let mut orders = self.store.list_orders().await?;
        orders.truncate(self.config.orders_limit);
        let menu = self.store.list_menu().await?;
        let settings = self.store.get_settings().await?;
        Ok(Snapshot {
            orders,
            menu,
            settings,
            fetched_at: util::now_millis(),
        })
    }

    /// Admin creates or updates a menu item.
    pub async fn upsert_menu_item(&self, item: MenuItem) -> AppResult<()> {
        if item.price < 0 {
            return Err(AppError::new(ErrorCode::MenuInvalidPrice).with_detail("menu", item.id));
        }
        if item.stock < 0 {
            return Err(AppError::new(ErrorCode::MenuInvalidStock).with_detail("menu", item.id));
        }
        self.store.upsert_menu_item(item).await
    }

    pub async fn delete_menu_item(&self, id: &str) -> AppResult<()> {
        self.store.delete_menu_item(id).await
    }

    pub async fn get_settings(&self) -> AppResult<Settings> {
        self.store.get_settings().await
    }

    pub async fn update_settings(&self, update: SettingsUpdate) -> AppResult<Settings> {
        if let Some(tables_count) = update.tables_count {
            if tables_count < 1 {
                return Err(AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    "table count must be at least 1",
                ));
            }
        }
        self.store.set_settings(update).await
    }
}
