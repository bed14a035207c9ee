//! Warung polling client
//!
//! Each view owns one synchronization context: a background task polling the
//! store on a fixed interval, a watch channel publishing the latest
//! snapshot, and an on-disk cache so the view renders immediately on reload.
//! No push channel exists; consistency is "every committed write is observed
//! within one polling interval, or right after the view's own write".
//!
//! # Poll Flow
//!
//! ```text
//! SyncHandle::refresh / interval tick
//!     ├─ 1. Suppressed while a poll is already in flight
//!     ├─ 2. Fetch orders + menu + settings as one snapshot
//!     ├─ 3. Drop the result if a refresh superseded this poll
//!     ├─ 4. Publish on the watch channel, persist to the cache
//!     └─ 5. On fetch failure keep the previous snapshot, flagged stale
//! ```

pub mod cache;
pub mod sync;

// Re-exports
pub use cache::SnapshotCache;
pub use sync::{SnapshotState, SyncClient, SyncHandle};
