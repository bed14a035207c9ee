//! Shared types for the Warung order system
//!
//! Domain models, the unified error taxonomy, the persistence/transport
//! collaborator contract, and utility helpers used across the core engine
//! and the synchronization client.

pub mod error;
pub mod models;
pub mod store;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use store::OrderStore;
