//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuCategory {
    Food,
    Drink,
}

/// Menu item entity
///
/// `price` is an integer amount in the smallest currency unit. Orders capture
/// a price snapshot at submit time, so editing a menu item never rewrites
/// existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    /// Stable string key
    pub id: String,
    pub name: String,
    pub price: i64,
    pub category: MenuCategory,
    pub stock: i32,
}
