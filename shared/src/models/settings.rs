//! Restaurant Settings Model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Restaurant-wide settings
///
/// An open key-value map with typed well-known keys; unknown keys survive a
/// round-trip through `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub tables_count: u32,
    pub promo_text: String,
    pub restaurant_name: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tables_count: 10,
            promo_text: String::new(),
            restaurant_name: "Warung".to_string(),
            extra: HashMap::new(),
        }
    }
}

/// Partial settings update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, Value>,
}

impl Settings {
    /// Apply a partial update in place.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(tables_count) = update.tables_count {
            self.tables_count = tables_count;
        }
        if let Some(promo_text) = update.promo_text {
            self.promo_text = promo_text;
        }
        if let Some(restaurant_name) = update.restaurant_name {
            self.restaurant_name = restaurant_name;
        }
        self.extra.extend(update.extra);
    }
}
