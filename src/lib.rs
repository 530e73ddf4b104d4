//! # openhash: string-keyed open-addressing hash table
//!
//! An open-addressing hash set for string keys with:
//!
//! - **Double Hashing**: forward and reverse Horner hashes combined into an
//!   odd-stepped probe sequence that visits every slot of a power-of-two table
//! - **Pluggable Probing**: any [`ProbeStrategy`] can drive the table
//! - **Tombstoned Deletion**: removed keys leave markers so probe chains stay
//!   intact, and later inserts reuse them
//! - **Automatic Growth**: the table doubles at a configurable load factor
//!   (0.75 by default), dropping tombstones as it rehashes
//!
//! ## Quick Start
//!
//! ```rust
//! use openhash::OpenHashTable;
//!
//! let mut table = OpenHashTable::with_capacity(8).unwrap();
//! assert!(table.insert("cat").unwrap());
//! assert!(table.insert("dog").unwrap());
//! assert!(!table.insert("cat").unwrap());
//! assert!(table.contains("dog"));
//! assert!(table.remove("cat"));
//! assert!(!table.contains("cat"));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash_map;

pub use config::{Config, GrowthPolicy, TableConfig};
pub use error::{OpenHashError, Result};
pub use hash_map::{DoubleHashing, LinearProbing, OpenHashTable, ProbeStrategy, Slot};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently no-op, for future use)
pub fn init() {
    log::debug!("Initializing openhash v{}", VERSION);
}
