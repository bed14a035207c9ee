//! Order submission validation
//!
//! Every accepted write must leave the order invariants intact: a non-empty
//! cart, positive quantities, non-negative price snapshots, a table number
//! exactly when the order is dine-in, and a customer exactly when the order
//! is online. Rejections carry the failing field in the error details and no
//! partial state is ever written.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CartSubmission, Order, OrderItem, OrderOrigin, OrderType};

/// Validate a submitted cart before append-or-create resolution.
pub fn validate_submission(sub: &CartSubmission, tables_count: u32) -> AppResult<()> {
    validate_items(&sub.items)?;
    validate_table(sub.order_type, sub.table_number, tables_count)?;
    validate_origin(sub.origin, sub.customer_id.as_deref())?;
    Ok(())
}

/// Validate a fully-formed order at creation time.
pub fn validate_order(order: &Order, tables_count: u32) -> AppResult<()> {
    validate_items(&order.items)?;
    validate_table(order.order_type, order.table_number, tables_count)?;
    validate_origin(order.origin, order.customer_id.as_deref())?;

    if order.total != order.computed_total() {
        return Err(AppError::validation("order total does not match its item sum")
            .with_detail("total", order.total)
            .with_detail("computed", order.computed_total()));
    }
    Ok(())
}

fn validate_items(items: &[OrderItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "item quantity must be at least 1",
            )
            .with_detail("item", item.id.clone()));
        }
        if item.price < 0 {
            return Err(
                AppError::validation("item price must be non-negative")
                    .with_detail("item", item.id.clone()),
            );
        }
    }
    Ok(())
}

fn validate_table(
    order_type: OrderType,
    table_number: Option<u32>,
    tables_count: u32,
) -> AppResult<()> {
    match order_type {
        OrderType::DineIn => {
            let table = table_number.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::RequiredField,
                    "dine-in order requires a table number",
                )
                .with_detail("field", "table_number")
            })?;
            if table < 1 || table > tables_count {
                return Err(AppError::new(ErrorCode::TableOutOfRange)
                    .with_detail("table", table)
                    .with_detail("tables_count", tables_count));
            }
        }
        OrderType::Takeaway => {
            if table_number.is_some() {
                return Err(AppError::validation(
                    "takeaway order must not carry a table number",
                ));
            }
        }
    }
    Ok(())
}

fn validate_origin(origin: OrderOrigin, customer_id: Option<&str>) -> AppResult<()> {
    match origin {
        OrderOrigin::Online => {
            if customer_id.is_none_or(str::is_empty) {
                return Err(AppError::with_message(
                    ErrorCode::RequiredField,
                    "online order requires a customer",
                )
                .with_detail("field", "customer_id"));
            }
        }
        OrderOrigin::Offline => {
            if customer_id.is_some() {
                return Err(AppError::validation(
                    "offline order must not carry a customer",
                ));
            }
        }
    }
    Ok(())
}
