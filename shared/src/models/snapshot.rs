//! Snapshot types for poll-based synchronization

use super::{MenuItem, Order, Settings};
use serde::{Deserialize, Serialize};

/// One full fetch of the shared state; the unit every view polls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Most-recent-first, bounded by the store
    pub orders: Vec<Order>,
    pub menu: Vec<MenuItem>,
    pub settings: Settings,
    /// Client-side fetch timestamp (UTC millis)
    pub fetched_at: i64,
}

impl Snapshot {
    /// Placeholder rendered before the first poll when no cache exists.
    pub fn empty() -> Self {
        Self {
            orders: Vec::new(),
            menu: Vec::new(),
            settings: Settings::default(),
            fetched_at: 0,
        }
    }
}
