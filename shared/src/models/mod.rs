//! Domain models

pub mod account;
pub mod menu_item;
pub mod order;
pub mod settings;
pub mod snapshot;

pub use account::{Account, CustomerAccount, StaffAccount, StaffRole};
pub use menu_item::{MenuCategory, MenuItem};
pub use order::{
    CartSubmission, Order, OrderItem, OrderOrigin, OrderPatch, OrderStatus, OrderType,
    PaymentMethod, PaymentStatus,
};
pub use settings::{Settings, SettingsUpdate};
pub use snapshot::Snapshot;
