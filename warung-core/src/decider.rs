//! Append-or-create resolution
//!
//! A table is a single running tab. A dine-in submission targeting an
//! occupied table merges into that tab instead of opening a second order;
//! takeaway submissions always create. The merge base is the order list the
//! caller just fetched from the store, never a client cache, so items added
//! by a concurrent submission are kept in the merged result.

use shared::models::{CartSubmission, Order, OrderItem, OrderPatch, OrderType};

use crate::occupancy::OccupancyMap;

/// Outcome of resolving a submission against the current snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitDecision {
    /// No open tab exists, open a new order.
    Create(Order),
    /// Merge the cart into the table's open tab with one items/total patch.
    Append { order_id: String, patch: OrderPatch },
}

impl SubmitDecision {
    /// Id of the order this decision targets or creates.
    pub fn order_id(&self) -> &str {
        match self {
            SubmitDecision::Create(order) => &order.id,
            SubmitDecision::Append { order_id, .. } => order_id,
        }
    }
}

/// Resolve a validated submission against a fresh snapshot.
///
/// Items are concatenated, never quantity-merged: submitting a menu entry
/// that already sits on the tab yields two line entries. The total is always
/// recomputed over the merged list, the submitted total is never trusted.
pub fn decide(orders: &[Order], submission: CartSubmission) -> SubmitDecision {
    if submission.order_type == OrderType::Takeaway {
        return SubmitDecision::Create(Order::from_submission(submission));
    }

    let table = match submission.table_number {
        Some(table) => table,
        None => return SubmitDecision::Create(Order::from_submission(submission)),
    };

    let occupancy = OccupancyMap::resolve(orders, table);
    let open_id = match occupancy.open_order(table) {
        Some(id) => id.to_string(),
        None => return SubmitDecision::Create(Order::from_submission(submission)),
    };

    // open_order came from this snapshot, the id is guaranteed present
    let base: Vec<OrderItem> = orders
        .iter()
        .find(|o| o.id == open_id)
        .map(|o| o.items.clone())
        .unwrap_or_default();

    let mut items = base;
    items.extend(submission.items);
    let total = items
        .iter()
        .map(|item| item.line_total())
        .sum();

    tracing::debug!(table, order = %open_id, "appending to open tab");
    SubmitDecision::Append {
        order_id: open_id,
        patch: OrderPatch::ItemsTotal { items, total },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderOrigin, OrderStatus, PaymentStatus};
    use shared::util;

    fn item(name: &str, price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            id: util::item_id(),
            menu_id: name.to_lowercase(),
            name: name.to_string(),
            price,
            quantity,
        }
    }

    fn dine_in_submission(table: u32, items: Vec<OrderItem>) -> CartSubmission {
        CartSubmission {
            order_type: OrderType::DineIn,
            table_number: Some(table),
            items,
            origin: OrderOrigin::Offline,
            customer_id: None,
        }
    }

    #[test]
    fn test_takeaway_always_creates() {
        let open = Order::from_submission(dine_in_submission(5, vec![item("Rice", 15000, 1)]));
        let sub = CartSubmission {
            order_type: OrderType::Takeaway,
            table_number: None,
            items: vec![item("Tea", 5000, 1)],
            origin: OrderOrigin::Offline,
            customer_id: None,
        };

        match decide(&[open], sub) {
            SubmitDecision::Create(order) => {
                assert_eq!(order.order_type, OrderType::Takeaway);
                assert_eq!(order.total, 5000);
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_free_table_creates() {
        let sub = dine_in_submission(3, vec![item("Rice", 15000, 2)]);
        match decide(&[], sub) {
            SubmitDecision::Create(order) => {
                assert_eq!(order.table_number, Some(3));
                assert_eq!(order.total, 30000);
                assert_eq!(order.status, OrderStatus::Pending);
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_occupied_table_appends_with_recomputed_total() {
        let open = Order::from_submission(dine_in_submission(5, vec![item("Rice", 15000, 1)]));
        let open_id = open.id.clone();

        let sub = dine_in_submission(5, vec![item("Tea", 5000, 2)]);
        match decide(&[open], sub) {
            SubmitDecision::Append { order_id, patch } => {
                assert_eq!(order_id, open_id);
                match patch {
                    OrderPatch::ItemsTotal { items, total } => {
                        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
                        assert_eq!(names, vec!["Rice", "Tea"]);
                        assert_eq!(total, 15000 + 2 * 5000);
                    }
                    other => panic!("unexpected patch: {:?}", other),
                }
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_menu_entries_stay_separate_lines() {
        let open = Order::from_submission(dine_in_submission(5, vec![item("Rice", 15000, 1)]));

        let sub = dine_in_submission(5, vec![item("Rice", 15000, 1)]);
        match decide(&[open], sub) {
            SubmitDecision::Append { patch, .. } => match patch {
                OrderPatch::ItemsTotal { items, total } => {
                    assert_eq!(items.len(), 2);
                    assert_eq!(total, 30000);
                }
                other => panic!("unexpected patch: {:?}", other),
            },
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_settled_table_creates_fresh_order() {
        let mut settled = Order::from_submission(dine_in_submission(5, vec![item("Rice", 15000, 1)]));
        settled.payment_status = PaymentStatus::Paid;
        settled.status = OrderStatus::Preparing;

        let sub = dine_in_submission(5, vec![item("Tea", 5000, 1)]);
        match decide(&[settled], sub) {
            SubmitDecision::Create(order) => assert_eq!(order.table_number, Some(5)),
            other => panic!("unexpected decision: {:?}", other),
        }
    }
}
