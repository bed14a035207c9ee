//! In-memory order store
//!
//! One `RwLock` around the whole state makes every patch a single atomic
//! statement: two concurrent payment writes on the same order serialize at
//! this boundary and the loser sees the winner's state, never a half-applied
//! mix of both.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MenuItem, Order, OrderPatch, OrderStatus, Settings, SettingsUpdate};
use shared::store::{ORDERS_LIMIT, OrderStore};

use crate::state_machine;

#[derive(Default)]
struct State {
    /// Insertion order, oldest first.
    orders: Vec<Order>,
    menu: HashMap<String, MenuItem>,
    settings: Settings,
}

/// Reference implementation of the store contract.
pub struct MemoryStore {
    state: RwLock<State>,
    limit: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_limit(ORDERS_LIMIT)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound `list_orders` to the most recent `limit` entries, typically
    /// wired from `CoreConfig::orders_limit`.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            state: RwLock::default(),
            limit,
        }
    }
}

fn apply_patch(order: &mut Order, patch: OrderPatch) -> AppResult<()> {
    match patch {
        OrderPatch::ItemsTotal { items, total } => {
            let computed: i64 = items.iter().map(|item| item.line_total()).sum();
            if total != computed {
                return Err(AppError::validation("patched total does not match its item sum")
                    .with_detail("total", total)
                    .with_detail("computed", computed));
            }
            order.items = items;
            order.total = total;
        }
        OrderPatch::Payment {
            status,
            payment_status,
            payment_method,
            courier_name,
        } => {
            if !state_machine::is_valid_combination(status, payment_status) {
                return Err(AppError::invalid_transition(
                    "patch would leave an invalid status combination",
                ));
            }
            order.status = status;
            order.payment_status = payment_status;
            // terminal fields are written once, later writes keep the first value
            order.payment_method.get_or_insert(payment_method);
            if let Some(courier) = courier_name {
                order.courier_name.get_or_insert(courier);
            }
        }
        OrderPatch::Status { status } => {
            if !state_machine::is_valid_combination(status, order.payment_status) {
                return Err(AppError::invalid_transition(
                    "patch would leave an invalid status combination",
                ));
            }
            order.status = status;
        }
        OrderPatch::PaymentProof { payment_proof } => {
            order.payment_proof.get_or_insert(payment_proof);
        }
        OrderPatch::Received => {
            // CANCELLED is terminal and a receipt needs a delivery in progress
            if !matches!(order.status, OrderStatus::OnDelivery | OrderStatus::Served) {
                return Err(AppError::invalid_transition(
                    "receipt patch applies only to an order on delivery",
                ));
            }
            order.status = OrderStatus::Served;
        }
    }
    Ok(())
}

#[async_trait]
impl OrderStore for MemoryStore {
    /// Most-recent-first, bounded listing.
    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let state = self.state.read();
        Ok(state.orders.iter().rev().take(self.limit).cloned().collect())
    }

    async fn create_order(&self, order: Order) -> AppResult<()> {
        let mut state = self.state.write();
        if state.orders.iter().any(|o| o.id == order.id) {
            return Err(
                AppError::new(ErrorCode::AlreadyExists).with_detail("order", order.id.clone())
            );
        }
        state.orders.push(order);
        Ok(())
    }

    async fn patch_order(&self, id: &str, patch: OrderPatch) -> AppResult<Order> {
        let mut state = self.state.write();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order", id))?;
        apply_patch(order, patch)?;
        Ok(order.clone())
    }

    async fn list_menu(&self) -> AppResult<Vec<MenuItem>> {
        let state = self.state.read();
        let mut menu: Vec<MenuItem> = state.menu.values().cloned().collect();
        menu.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(menu)
    }

    async fn upsert_menu_item(&self, item: MenuItem) -> AppResult<()> {
        let mut state = self.state.write();
        state.menu.insert(item.id.clone(), item);
        Ok(())
    }

    async fn delete_menu_item(&self, id: &str) -> AppResult<()> {
        let mut state = self.state.write();
        if state.menu.remove(id).is_none() {
            return Err(AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu", id));
        }
        Ok(())
    }

    async fn get_settings(&self) -> AppResult<Settings> {
        Ok(self.state.read().settings.clone())
    }

    async fn set_settings(&self, update: SettingsUpdate) -> AppResult<Settings> {
        let mut state = self.state.write();
        state.settings.apply(update);
        Ok(state.settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{
        CartSubmission, OrderItem, OrderOrigin, OrderType, PaymentMethod, PaymentStatus,
    };
    use shared::util;

    fn order() -> Order {
        Order::from_submission(CartSubmission {
            order_type: OrderType::DineIn,
            table_number: Some(1),
            items: vec![OrderItem {
                id: util::item_id(),
                menu_id: "rice".to_string(),
                name: "Rice".to_string(),
                price: 15000,
                quantity: 1,
            }],
            origin: OrderOrigin::Offline,
            customer_id: None,
        })
    }

    #[tokio::test]
    async fn test_create_rejects_id_collision() {
        let store = MemoryStore::new();
        let order = order();
        store.create_order(order.clone()).await.unwrap();

        let err = store.create_order(order).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn test_listing_is_most_recent_first() {
        let store = MemoryStore::new();
        let first = order();
        let second = order();
        store.create_order(first.clone()).await.unwrap();
        store.create_order(second.clone()).await.unwrap();

        let orders = store.list_orders().await.unwrap();
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }

    #[tokio::test]
    async fn test_listing_respects_configured_limit() {
        let store = MemoryStore::with_limit(2);
        let oldest = order();
        store.create_order(oldest.clone()).await.unwrap();
        store.create_order(order()).await.unwrap();
        store.create_order(order()).await.unwrap();

        let orders = store.list_orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.id != oldest.id));
    }

    #[tokio::test]
    async fn test_items_patch_rejects_wrong_total() {
        let store = MemoryStore::new();
        let order = order();
        let items = order.items.clone();
        store.create_order(order.clone()).await.unwrap();

        let err = store
            .patch_order(&order.id, OrderPatch::ItemsTotal { items, total: 1 })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_terminal_fields_are_write_once() {
        let store = MemoryStore::new();
        let order = order();
        store.create_order(order.clone()).await.unwrap();

        let paid = store
            .patch_order(
                &order.id,
                OrderPatch::Payment {
                    status: OrderStatus::Preparing,
                    payment_status: PaymentStatus::Paid,
                    payment_method: PaymentMethod::Cash,
                    courier_name: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));

        // a duplicate payment write keeps the first method
        let again = store
            .patch_order(
                &order.id,
                OrderPatch::Payment {
                    status: OrderStatus::Preparing,
                    payment_status: PaymentStatus::Paid,
                    payment_method: PaymentMethod::Card,
                    courier_name: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(again.payment_method, Some(PaymentMethod::Cash));
    }

    #[tokio::test]
    async fn test_payment_patch_rejects_invalid_combination() {
        let store = MemoryStore::new();
        let order = order();
        store.create_order(order.clone()).await.unwrap();

        let err = store
            .patch_order(
                &order.id,
                OrderPatch::Payment {
                    status: OrderStatus::Pending,
                    payment_status: PaymentStatus::Paid,
                    payment_method: PaymentMethod::Cash,
                    courier_name: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[tokio::test]
    async fn test_received_patch_serves_a_delivery() {
        let store = MemoryStore::new();
        let order = order();
        store.create_order(order.clone()).await.unwrap();

        store
            .patch_order(
                &order.id,
                OrderPatch::Payment {
                    status: OrderStatus::OnDelivery,
                    payment_status: PaymentStatus::Paid,
                    payment_method: PaymentMethod::Bca,
                    courier_name: Some("Budi".to_string()),
                },
            )
            .await
            .unwrap();

        let served = store
            .patch_order(&order.id, OrderPatch::Received)
            .await
            .unwrap();
        assert_eq!(served.status, OrderStatus::Served);

        // repeating the receipt leaves the order served
        let again = store
            .patch_order(&order.id, OrderPatch::Received)
            .await
            .unwrap();
        assert_eq!(again.status, OrderStatus::Served);
    }

    #[tokio::test]
    async fn test_received_patch_rejected_outside_delivery() {
        let store = MemoryStore::new();
        let order = order();
        store.create_order(order.clone()).await.unwrap();

        // not accepted while the order is still pending
        let err = store
            .patch_order(&order.id, OrderPatch::Received)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);

        // a cancelled order stays cancelled
        store
            .patch_order(
                &order.id,
                OrderPatch::Status {
                    status: OrderStatus::Cancelled,
                },
            )
            .await
            .unwrap();
        let err = store
            .patch_order(&order.id, OrderPatch::Received)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);

        let orders = store.list_orders().await.unwrap();
        assert_eq!(orders[0].status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_menu_delete_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_menu_item("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }
}
