//! Storage abstraction and implementations for Workcast.
//!
//! This crate provides a trait-based persistence interface with a JSON file
//! implementation and an in-memory one for tests and embedding.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
