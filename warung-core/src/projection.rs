//! Role-scoped snapshot projection
//!
//! Every role polls the same global snapshot; what differs is the subset it
//! may see and act on. Projections are pure filters over one snapshot, so a
//! view never acts on an order its role cannot see.

use shared::models::{
    Account, Order, OrderOrigin, OrderStatus, PaymentStatus, Snapshot, StaffRole,
};

/// What one account is allowed to see out of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub orders: Vec<Order>,
    /// Menu and settings writes are admin-only.
    pub can_manage_menu: bool,
}

/// Project a snapshot for an account.
///
/// - waiter: open dine-in tabs and unpaid offline takeaways
/// - cashier: everything awaiting a payment action
/// - admin and management: the full order list
/// - customer: only their own online orders
pub fn project(snapshot: &Snapshot, account: &Account) -> Projection {
    match account {
        Account::Staff(staff) => match staff.role {
            StaffRole::Waiter => Projection {
                orders: filter(&snapshot.orders, |o| {
                    o.origin == OrderOrigin::Offline && is_actionable(o)
                }),
                can_manage_menu: false,
            },
            StaffRole::Cashier => Projection {
                orders: payment_queue(&snapshot.orders),
                can_manage_menu: false,
            },
            StaffRole::Admin => Projection {
                orders: snapshot.orders.clone(),
                can_manage_menu: true,
            },
            StaffRole::Management => Projection {
                orders: snapshot.orders.clone(),
                can_manage_menu: false,
            },
        },
        Account::Customer(customer) => Projection {
            orders: filter(&snapshot.orders, |o| {
                o.customer_id.as_deref() == Some(customer.id.as_str())
            }),
            can_manage_menu: false,
        },
    }
}

/// Orders awaiting a payment action by the cashier.
///
/// Offline orders queue as soon as they are open. Online orders queue once a
/// payment proof exists; without proof the approval gate stays closed and
/// the order is not actionable yet.
pub fn payment_queue(orders: &[Order]) -> Vec<Order> {
    filter(orders, |o| {
        is_actionable(o)
            && match o.origin {
                OrderOrigin::Offline => true,
                OrderOrigin::Online => o.payment_proof.is_some(),
            }
    })
}

/// Unpaid, not cancelled and not yet served: still has a pending action.
fn is_actionable(order: &Order) -> bool {
    order.payment_status == PaymentStatus::Unpaid
        && order.status != OrderStatus::Cancelled
        && order.status != OrderStatus::Served
}

fn filter(orders: &[Order], keep: impl Fn(&Order) -> bool) -> Vec<Order> {
    orders.iter().filter(|o| keep(o)).cloned().collect()
}
