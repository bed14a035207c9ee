//! Warung core engine
//!
//! The order lifecycle state machine and the optimistic-merge rules every
//! polling view relies on:
//!
//! - **validator**: accept/reject rules for submitted carts
//! - **state_machine**: valid status/payment transitions and who triggers them
//! - **occupancy**: derived table → open-order mapping
//! - **decider**: append-or-create resolution for dine-in submissions
//! - **service**: applies the above atomically at the persistence boundary
//! - **projection**: role-scoped views over the global snapshot
//! - **store**: in-memory reference implementation of the store contract
//!
//! # Write Flow
//!
//! ```text
//! submit/patch intent
//!     ├─ 1. Validate against settings (tables_count)
//!     ├─ 2. Fetch the authoritative snapshot (never a client cache)
//!     ├─ 3. State machine / decider produces one atomic patch
//!     ├─ 4. Store applies the patch as a single statement
//!     └─ 5. Every polling client observes the result next cycle
//! ```

pub mod config;
pub mod decider;
pub mod occupancy;
pub mod projection;
pub mod service;
pub mod state_machine;
pub mod store;
pub mod validator;

// Re-exports
pub use config::CoreConfig;
pub use decider::SubmitDecision;
pub use occupancy::{ConflictAnomaly, OccupancyMap, TableState};
pub use projection::Projection;
pub use service::OrderService;
pub use store::MemoryStore;
