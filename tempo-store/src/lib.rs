//! tempo-store: persistence layer for Tempo.
//!
//! A small key-value contract (`KeyValue`), a file-backed and an in-memory
//! implementation, and the `TaskStore` that owns the active/completed/
//! archived collections plus the daily-review bookkeeping.

pub mod fs;
pub mod kv;
pub mod store;

pub use fs::FsKv;
pub use kv::{KeyValue, MemoryKv};
pub use store::{REVIEW_RETENTION_DAYS, TaskStore};
