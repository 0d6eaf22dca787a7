//! Host-facing contracts for the portal desktop runtime.
//!
//! This crate is the boundary between the window-manager runtime and the
//! environment it runs in. It exposes the durable key-value store seam the
//! runtime persists through plus the time helpers used for generated ids,
//! while concrete browser adapters stay in the embedding application.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::{
    load_item_typed, store_item_typed, LocalStore, LocalStoreFuture, MemoryLocalStore,
    NoopLocalStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
