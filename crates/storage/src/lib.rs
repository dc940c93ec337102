//! Storage layer for projdex
//!
//! This crate implements the entry store:
//! - EntryBuffer: chunked arena of identifiers and reduced vectors
//! - EntryStore: single-writer store guarded by `parking_lot::RwLock`
//! - EntrySnapshot: immutable shared view handed to search and persistence

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod error;
pub mod store;

pub use buffer::{EntryBuffer, EntryRef, Iter, CHUNK_ENTRIES};
pub use error::{StoreError, StoreResult};
pub use store::{EntrySnapshot, EntryStore};
