//! Configuration APIs for openhash
//!
//! Table behavior (starting capacity, growth threshold and whether growth
//! happens before or after a key is placed) is described by plain
//! serializable structs implementing the [`Config`] trait.
//!
//! # Preset Configurations
//!
//! ```rust
//! use openhash::config::{Config, TableConfig};
//!
//! // Fewer probes per operation at the cost of memory
//! let config = TableConfig::performance_preset();
//!
//! // Denser table
//! let config = TableConfig::memory_preset();
//!
//! // Pre-sized so early inserts never rehash
//! let config = TableConfig::realtime_preset();
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use openhash::config::{Config, TableConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads OPENHASH_TABLE_* variables
//! let config = TableConfig::from_env()?;
//!
//! // Reads MYAPP_TABLE_* variables
//! let config = TableConfig::from_env_with_prefix("MYAPP_")?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod table;


pub use table::{GrowthPolicy, TableConfig};

/// Common configuration trait providing validation, environment
/// initialization, presets and file persistence.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables with the
    /// `OPENHASH_` prefix.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("OPENHASH_")
    }

    /// Initialize configuration from environment variables with a custom
    /// prefix. Unset or unparsable variables keep their default value.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset favoring speed over memory.
    fn performance_preset() -> Self;

    /// Preset favoring memory over speed.
    fn memory_preset() -> Self;

    /// Preset favoring predictable latency.
    fn realtime_preset() -> Self;

    /// Balanced preset, the default.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a file as pretty-printed JSON.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Parse an environment variable, falling back to `default` when it is
/// unset or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
