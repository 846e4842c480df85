//! Ephemeral in-process backend for the stash asset store.
//!
//! Holds everything in a `HashMap` behind an async `RwLock`. Nothing is
//! persisted and nothing is shared across processes — this backend exists
//! for call sites with no reachable durable store (pre-authentication
//! flows, tests) and for the legacy migration shim's fallback mode.

mod store;

pub use store::MemoryStore;
