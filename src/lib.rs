// Warehouse Tracker - Core Library
// Exposes all modules for use in CLI, web server, and tests

pub mod storage;    // Storage entity (unchecked arithmetic)
pub mod registry;   // Id-indexed collection of named storages
pub mod inventory;  // Checked operations over text input
pub mod demo;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use storage::Storage;
pub use registry::{RegistryEntry, StorageId, StorageRegistry};
pub use inventory::{
    parse_amount, EditAction, EditOutcome, EditRequest,
    InputError, InputResult, Inventory, InventorySummary, OverflowPolicy,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
