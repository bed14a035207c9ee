//! Store implementations
//!
//! The persistence contract lives in `shared::store`; this module carries
//! the in-process reference implementation used by the service tests and as
//! the template any real backend has to match patch-for-patch.

mod memory;

pub use memory::MemoryStore;
