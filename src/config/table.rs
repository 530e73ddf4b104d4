//! Open-addressing table configuration.

use super::{parse_env_var, Config};
use crate::error::{OpenHashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Smallest slot count a table is ever created with
pub const MIN_CAPACITY: usize = 8;

/// Growth threshold used unless configured otherwise
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Accepted range for `max_load_factor`
pub const LOAD_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 0.25..=0.95;

/// When the load-factor check runs relative to placing a new key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Grow first if the new key would reach the threshold
    BeforeInsert,
    /// Place the key, then grow if the threshold was reached
    #[default]
    AfterInsert,
}

impl fmt::Display for GrowthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeInsert => f.write_str("before"),
            Self::AfterInsert => f.write_str("after"),
        }
    }
}

impl FromStr for GrowthPolicy {
    type Err = OpenHashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "before" | "before_insert" => Ok(Self::BeforeInsert),
            "after" | "after_insert" => Ok(Self::AfterInsert),
            other => Err(OpenHashError::configuration(format!(
                "unknown growth policy '{}', expected 'before' or 'after'",
                other
            ))),
        }
    }
}

/// Configuration for [`OpenHashTable`](crate::hash_map::OpenHashTable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Minimum starting slot count, rounded up to a power of two (at least 8)
    pub initial_capacity: usize,
    /// Load factor at which the table doubles
    pub max_load_factor: f64,
    /// Whether growth is checked before or after placing a key
    pub growth_policy: GrowthPolicy,
    /// Largest slot count growth may reach; `None` leaves growth unbounded
    #[serde(default)]
    pub max_capacity: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: MIN_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            growth_policy: GrowthPolicy::AfterInsert,
            max_capacity: None,
        }
    }
}

impl TableConfig {
    /// Default configuration with a different starting capacity
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// Slot count a table built from this configuration starts with
    pub fn effective_capacity(&self) -> Result<usize> {
        self.initial_capacity
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .ok_or_else(|| OpenHashError::capacity_overflow(self.initial_capacity))
    }

    /// Check a slot count a table wants to grow to against `max_capacity`
    pub fn check_capacity(&self, capacity: usize) -> Result<()> {
        match self.max_capacity {
            Some(max) if capacity > max => Err(OpenHashError::capacity_overflow(capacity)),
            _ => Ok(()),
        }
    }
}

impl Config for TableConfig {
    fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(OpenHashError::configuration(
                "initial_capacity must be greater than 0",
            ));
        }
        if !LOAD_FACTOR_RANGE.contains(&self.max_load_factor) {
            return Err(OpenHashError::configuration(format!(
                "max_load_factor {} outside {:?}",
                self.max_load_factor, LOAD_FACTOR_RANGE
            )));
        }
        let capacity = self.effective_capacity()?;
        if let Some(max) = self.max_capacity {
            if max < capacity {
                return Err(OpenHashError::configuration(format!(
                    "max_capacity {} is below the starting capacity {}",
                    max, capacity
                )));
            }
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.initial_capacity = parse_env_var(
            &format!("{}TABLE_INITIAL_CAPACITY", prefix),
            config.initial_capacity,
        );
        config.max_load_factor = parse_env_var(
            &format!("{}TABLE_MAX_LOAD_FACTOR", prefix),
            config.max_load_factor,
        );
        if let Ok(policy) = std::env::var(format!("{}TABLE_GROWTH_POLICY", prefix)) {
            config.growth_policy = policy.parse()?;
        }
        if let Ok(raw) = std::env::var(format!("{}TABLE_MAX_CAPACITY", prefix)) {
            let max: usize = raw.trim().parse().map_err(|e| {
                OpenHashError::configuration(format!("invalid max_capacity '{}': {}", raw, e))
            })?;
            config.max_capacity = Some(max);
        }
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            initial_capacity: 64,
            max_load_factor: 0.5,
            growth_policy: GrowthPolicy::BeforeInsert,
            max_capacity: None,
        }
    }

    fn memory_preset() -> Self {
        Self {
            initial_capacity: MIN_CAPACITY,
            max_load_factor: 0.875,
            growth_policy: GrowthPolicy::AfterInsert,
            max_capacity: None,
        }
    }

    fn realtime_preset() -> Self {
        Self {
            initial_capacity: 1024,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            growth_policy: GrowthPolicy::BeforeInsert,
            max_capacity: None,
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            OpenHashError::configuration(format!("Failed to serialize table config: {}", e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            OpenHashError::configuration(format!("Failed to write table config file: {}", e))
        })?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OpenHashError::configuration(format!("Failed to read table config file: {}", e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            OpenHashError::configuration(format!("Failed to parse table config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
