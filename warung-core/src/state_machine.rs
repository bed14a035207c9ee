//! Order lifecycle state machine
//!
//! Operational status and payment status are two orthogonal fields mutated
//! together by most transitions. Each operation inspects the authoritative
//! order (freshly fetched, never a client cache) and either produces the
//! single atomic patch to apply or rejects with a typed error, leaving no
//! partial write. Callers that get a rejection refetch the snapshot instead
//! of trusting their optimistic local state.
//!
//! # Lifecycle
//!
//! ```text
//! offline: PENDING ──confirm paid──▶ PREPARING ──▶ SERVED
//! online:  PENDING ──approve──▶ ON_DELIVERY ──received──▶ SERVED
//! any unpaid, not SERVED ──▶ CANCELLED
//! ```

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderOrigin, OrderPatch, OrderStatus, PaymentMethod, PaymentStatus};

/// Valid (status, payment_status) combinations.
///
/// SERVED + UNPAID is deliberately allowed: an offline tab can be served
/// first and settled at the counter afterwards. PAID never coexists with
/// PENDING or CANCELLED because every payment write advances the status in
/// the same commit and paid orders can no longer be cancelled.
pub fn is_valid_combination(status: OrderStatus, payment: PaymentStatus) -> bool {
    use OrderStatus::*;
    use PaymentStatus::*;
    match (status, payment) {
        (Pending, Unpaid) => true,
        (Pending, Paid) => false,
        (Preparing, _) => true,
        (OnDelivery, Paid) => true,
        (OnDelivery, Unpaid) => false,
        (Served, _) => true,
        (Cancelled, Unpaid) => true,
        (Cancelled, Paid) => false,
    }
}

/// Allowed status-only advances, independent of payment writes.
///
/// SERVED → SERVED is permitted so that a repeated receipt confirmation is a
/// no-op instead of an error.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    match (from, to) {
        (Pending, Preparing) => true,
        (Preparing, Served) => true,
        (OnDelivery, Served) => true,
        (Pending | Preparing | OnDelivery, Cancelled) => true,
        (Served, Served) => true,
        _ => false,
    }
}

/// Cashier confirms an offline payment: payment status, method and
/// operational status move in one atomic write.
///
/// A tab that was already served settles in place; payment never rewinds the
/// status.
pub fn confirm_offline_payment(order: &Order, method: PaymentMethod) -> AppResult<OrderPatch> {
    if order.origin != OrderOrigin::Offline {
        return Err(reject(
            order,
            "offline payment confirmation does not apply to an online order",
        ));
    }
    ensure_payable(order)?;

    let status = if order.status == OrderStatus::Served {
        OrderStatus::Served
    } else {
        OrderStatus::Preparing
    };

    tracing::debug!(order = %order.id, ?method, "confirming offline payment");
    Ok(OrderPatch::Payment {
        status,
        payment_status: PaymentStatus::Paid,
        payment_method: method,
        courier_name: None,
    })
}

/// Customer attaches a transfer proof, exactly once while unpaid.
pub fn attach_payment_proof(order: &Order, proof: impl Into<String>) -> AppResult<OrderPatch> {
    require_online(order)?;
    ensure_payable(order)?;
    if order.payment_proof.is_some() {
        return Err(
            AppError::new(ErrorCode::PaymentProofAlreadySet).with_detail("order", order.id.clone())
        );
    }
    Ok(OrderPatch::PaymentProof {
        payment_proof: proof.into(),
    })
}

/// Cashier approves an online payment and assigns a courier.
///
/// The review step before this call is a read-only gate; this is the only
/// write. Online payments are bank-transfer only, so the method is fixed.
pub fn approve_online_payment(order: &Order, courier_name: &str) -> AppResult<OrderPatch> {
    require_online(order)?;
    ensure_payable(order)?;
    if order.payment_proof.is_none() {
        return Err(
            AppError::new(ErrorCode::PaymentProofMissing).with_detail("order", order.id.clone())
        );
    }
    let courier = courier_name.trim();
    if courier.is_empty() {
        return Err(AppError::new(ErrorCode::CourierNameRequired));
    }

    tracing::debug!(order = %order.id, courier, "approving online payment");
    Ok(OrderPatch::Payment {
        status: OrderStatus::OnDelivery,
        payment_status: PaymentStatus::Paid,
        payment_method: PaymentMethod::Bca,
        courier_name: Some(courier.to_string()),
    })
}

/// Customer confirms receipt of an online order.
///
/// Idempotent: `Ok(None)` on an order that is already served means there is
/// nothing left to write.
pub fn confirm_received(order: &Order) -> AppResult<Option<OrderPatch>> {
    require_online(order)?;
    if order.status == OrderStatus::Served {
        return Ok(None);
    }
    if order.payment_status != PaymentStatus::Paid || order.status != OrderStatus::OnDelivery {
        return Err(reject(
            order,
            "receipt can only be confirmed once the order is on delivery",
        ));
    }
    Ok(Some(OrderPatch::Received))
}

/// Staff advances the operational status on its own.
///
/// Cancellation is blocked once the order is paid; SERVED and CANCELLED are
/// terminal for every other target.
pub fn advance_status(order: &Order, to: OrderStatus) -> AppResult<OrderPatch> {
    if to == OrderStatus::Cancelled {
        if order.payment_status == PaymentStatus::Paid {
            return Err(AppError::with_message(
                ErrorCode::OrderAlreadyPaid,
                "a paid order can no longer be cancelled",
            )
            .with_detail("order", order.id.clone()));
        }
        if order.status == OrderStatus::Cancelled {
            return Err(
                AppError::new(ErrorCode::OrderAlreadyCancelled)
                    .with_detail("order", order.id.clone()),
            );
        }
    }
    if !can_transition(order.status, to) {
        return Err(reject(order, "status advance not allowed from this state"));
    }
    Ok(OrderPatch::Status { status: to })
}

fn require_online(order: &Order) -> AppResult<()> {
    if order.origin != OrderOrigin::Online {
        return Err(reject(order, "operation applies only to online orders"));
    }
    Ok(())
}

/// An order accepts payment-path writes only while unpaid and not cancelled.
fn ensure_payable(order: &Order) -> AppResult<()> {
    if order.payment_status == PaymentStatus::Paid {
        return Err(
            AppError::new(ErrorCode::OrderAlreadyPaid).with_detail("order", order.id.clone())
        );
    }
    if order.status == OrderStatus::Cancelled {
        return Err(
            AppError::new(ErrorCode::OrderAlreadyCancelled).with_detail("order", order.id.clone())
        );
    }
    Ok(())
}

fn reject(order: &Order, reason: &str) -> AppError {
    AppError::invalid_transition(reason)
        .with_detail("order", order.id.clone())
        .with_detail("status", format!("{:?}", order.status))
        .with_detail("payment_status", format!("{:?}", order.payment_status))
}
