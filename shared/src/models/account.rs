//! Account Model
//!
//! Staff and customers authenticate through different channels and carry
//! different shapes; the discriminant travels on the wire as `kind`.

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Waiter,
    Cashier,
    Admin,
    Management,
}

/// Staff account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffAccount {
    pub username: String,
    pub role: StaffRole,
}

/// Online customer account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerAccount {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Authenticated account, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Account {
    Staff(StaffAccount),
    Customer(CustomerAccount),
}

impl Account {
    pub fn staff(username: impl Into<String>, role: StaffRole) -> Self {
        Self::Staff(StaffAccount {
            username: username.into(),
            role,
        })
    }
}
