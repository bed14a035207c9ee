//! Order Model
//!
//! Operational status and payment status are deliberately two independent
//! enums mutated together by most transitions; the valid combinations live
//! in the core state machine, not here.

use crate::util;
use serde::{Deserialize, Serialize};

/// Dine-in vs takeaway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

/// Operational status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    OnDelivery,
    Served,
    Cancelled,
}

/// Payment status, orthogonal to [`OrderStatus`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

/// Payment method, set once when payment status becomes PAID
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Qris,
    /// Bank transfer; the only method for online orders
    Bca,
}

/// Where the order entered the system; immutable after creation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderOrigin {
    /// Entered by staff at the point of sale
    Offline,
    /// Placed through the customer-facing channel
    Online,
}

/// Order line item
///
/// `name` and `price` are captured from the menu at order time; later menu
/// edits never alter them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    /// Unique within its order
    pub id: String,
    /// Menu item reference, not an ownership link
    pub menu_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

impl OrderItem {
    /// Build a line item from a menu entry, snapshotting name and price.
    pub fn from_menu(menu: &super::MenuItem, quantity: u32) -> Self {
        Self {
            id: util::item_id(),
            menu_id: menu.id.clone(),
            name: menu.name.clone(),
            price: menu.price,
            quantity,
        }
    }

    pub fn line_total(&self) -> i64 {
        self.price * self.quantity as i64
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Globally unique, generated client-side at creation
    pub id: String,
    pub order_type: OrderType,
    /// Present iff `order_type` is DINE_IN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    pub items: Vec<OrderItem>,
    /// Always recomputed from the item list; never trusted from a client
    pub total: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Set-once, present iff payment status is PAID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub origin: OrderOrigin,
    /// Present iff origin is ONLINE; immutable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Opaque proof-of-payment reference; online-only, set once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_proof: Option<String>,
    /// Set-once, assigned during online approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    /// Creation timestamp in UTC milliseconds; immutable
    pub created_at: i64,
}

impl Order {
    /// Build a fresh PENDING/UNPAID order from a validated submission.
    ///
    /// The id is generated here on the submitting side; the total is
    /// recomputed from the items, not taken from the submitter.
    pub fn from_submission(sub: CartSubmission) -> Self {
        let total = sub.items.iter().map(OrderItem::line_total).sum();
        Self {
            id: util::order_id(),
            order_type: sub.order_type,
            table_number: sub.table_number,
            items: sub.items,
            total,
            status: OrderStatus::default(),
            payment_status: PaymentStatus::default(),
            payment_method: None,
            origin: sub.origin,
            customer_id: sub.customer_id,
            payment_proof: None,
            courier_name: None,
            created_at: util::now_millis(),
        }
    }

    /// Sum of line totals over the current item list.
    pub fn computed_total(&self) -> i64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// An open order is a dine-in table's current running tab.
    pub fn is_open(&self) -> bool {
        self.order_type == OrderType::DineIn
            && self.payment_status == PaymentStatus::Unpaid
            && self.status != OrderStatus::Cancelled
    }
}

/// A submitted cart, before append-or-create resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSubmission {
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    pub items: Vec<OrderItem>,
    pub origin: OrderOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// Recognized partial-field groups for `patch_order`
///
/// The store applies each variant as a single atomic statement; writes
/// outside these groups are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPatch {
    /// Append merge: replaces the item list and the recomputed total
    ItemsTotal { items: Vec<OrderItem>, total: i64 },
    /// Payment confirmation / online approval commit
    Payment {
        status: OrderStatus,
        payment_status: PaymentStatus,
        payment_method: PaymentMethod,
        #[serde(skip_serializing_if = "Option::is_none")]
        courier_name: Option<String>,
    },
    /// Simple status advance
    Status { status: OrderStatus },
    /// Customer proof-of-payment upload
    PaymentProof { payment_proof: String },
    /// Receipt confirmation; maps to a SERVED transition
    Received,
}
