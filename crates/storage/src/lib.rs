//! Task storage for taskrank.
//!
//! The prioritization core never touches storage; this crate supplies the
//! candidate set for server-side `suggest` through the [`TaskStore`] trait.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{TaskStore, StorageError, Result};
pub use json_storage::JsonTaskStore;
pub use memory::MemoryTaskStore;
