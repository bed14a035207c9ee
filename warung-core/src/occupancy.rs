//! Table occupancy resolver
//!
//! Occupancy is derived from the order snapshot on every read, never stored:
//! a table is occupied by the single open order targeting it. Open means a
//! dine-in order that is still unpaid and not cancelled. When a race leaves
//! more than one open order on a table the resolver still returns a
//! deterministic pick (the most recently created order) and reports the rest
//! as an anomaly instead of dropping them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::models::Order;

/// Occupancy of a single table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    Free,
    /// Id of the open order holding the table.
    Occupied(String),
}

impl TableState {
    pub fn is_free(&self) -> bool {
        matches!(self, TableState::Free)
    }
}

/// More than one open order was found for the same table.
///
/// Surfaced to an operator, not auto-resolved. `winner` is the order the
/// resolver treats as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConflictAnomaly {
    pub table: u32,
    pub winner: String,
    pub losers: Vec<String>,
}

/// Derived table → open-order mapping over one snapshot.
#[derive(Debug, Clone)]
pub struct OccupancyMap {
    tables: HashMap<u32, TableState>,
    anomalies: Vec<ConflictAnomaly>,
}

impl OccupancyMap {
    /// Resolve occupancy for tables `1..=tables_count` from a snapshot.
    ///
    /// Orders outside the table range still occupy their table entry so the
    /// append path keeps working after a settings change shrank the range.
    pub fn resolve(orders: &[Order], tables_count: u32) -> Self {
        let mut open: HashMap<u32, Vec<&Order>> = HashMap::new();
        for order in orders.iter().filter(|o| o.is_open()) {
            if let Some(table) = order.table_number {
                open.entry(table).or_default().push(order);
            }
        }

        let mut tables: HashMap<u32, TableState> = (1..=tables_count)
            .map(|t| (t, TableState::Free))
            .collect();
        let mut anomalies = Vec::new();

        for (table, mut candidates) in open {
            // most recently created wins, ties broken by id for determinism
            candidates.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            let winner = candidates[0].id.clone();
            if candidates.len() > 1 {
                let losers: Vec<String> = candidates[1..].iter().map(|o| o.id.clone()).collect();
                tracing::warn!(
                    table,
                    winner = %winner,
                    losers = ?losers,
                    "multiple open orders for one table"
                );
                anomalies.push(ConflictAnomaly {
                    table,
                    winner: winner.clone(),
                    losers,
                });
            }
            tables.insert(table, TableState::Occupied(winner));
        }

        anomalies.sort_by_key(|a| a.table);
        Self { tables, anomalies }
    }

    /// State of one table. Tables outside the resolved range read as free.
    pub fn table(&self, table: u32) -> &TableState {
        self.tables.get(&table).unwrap_or(&TableState::Free)
    }

    /// Id of the open order on a table, if any.
    pub fn open_order(&self, table: u32) -> Option<&str> {
        match self.table(table) {
            TableState::Occupied(id) => Some(id),
            TableState::Free => None,
        }
    }

    /// Tables a new dine-in order may select.
    pub fn free_tables(&self) -> Vec<u32> {
        let mut free: Vec<u32> = self
            .tables
            .iter()
            .filter(|(_, state)| state.is_free())
            .map(|(table, _)| *table)
            .collect();
        free.sort_unstable();
        free
    }

    pub fn anomalies(&self) -> &[ConflictAnomaly] {
        &self.anomalies
    }
}
