/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a new order ID.
///
/// Orders are created on the submitting client before any round-trip, so the
/// ID must be collision-free without coordination. UUID v4.
pub fn order_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a line-item ID, unique within its order.
pub fn item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
