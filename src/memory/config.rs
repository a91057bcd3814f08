/*!
 * Memory Configuration
 * Address-space geometry, loadable from JSON
 */

use super::types::{MemoryError, MemoryResult};
use crate::core::limits::{
    DEFAULT_FIXED_PARTITION, DEFAULT_TOTAL_MEMORY, DEFAULT_VARIABLE_PARTITIONS,
};
use crate::core::types::Size;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "PARTITION_SIM_CONFIG";

/// Geometry of the simulated address space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    pub total_memory: Size,
    pub fixed_partition_size: Size,
    pub variable_partitions: Vec<Size>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            fixed_partition_size: DEFAULT_FIXED_PARTITION,
            variable_partitions: DEFAULT_VARIABLE_PARTITIONS.to_vec(),
        }
    }
}

impl MemoryConfig {
    pub fn new(total_memory: Size) -> Self {
        Self {
            total_memory,
            ..Self::default()
        }
    }

    pub fn with_fixed_partition_size(mut self, size: Size) -> Self {
        self.fixed_partition_size = size;
        self
    }

    pub fn with_variable_partitions(mut self, sizes: Vec<Size>) -> Self {
        self.variable_partitions = sizes;
        self
    }

    /// Number of partitions fixed mode lays out
    pub fn fixed_partition_count(&self) -> usize {
        self.total_memory / self.fixed_partition_size
    }

    /// Check that every mode can tile the address space exactly
    pub fn validate(&self) -> MemoryResult<()> {
        if self.total_memory == 0 {
            return Err(MemoryError::configuration("total memory must be non-zero"));
        }

        if self.fixed_partition_size == 0 {
            return Err(MemoryError::configuration(
                "fixed partition size must be non-zero",
            ));
        }
        if self.total_memory % self.fixed_partition_size != 0 {
            return Err(MemoryError::configuration(format!(
                "fixed partition size {} does not divide total memory {}",
                self.fixed_partition_size, self.total_memory
            )));
        }

        if self.variable_partitions.is_empty() {
            return Err(MemoryError::configuration(
                "variable mode needs at least one partition",
            ));
        }
        if self.variable_partitions.contains(&0) {
            return Err(MemoryError::configuration(
                "variable partition sizes must be non-zero",
            ));
        }
        let sum = self
            .variable_partitions
            .iter()
            .try_fold(0usize, |acc, size| acc.checked_add(*size));
        if sum != Some(self.total_memory) {
            return Err(MemoryError::configuration(format!(
                "variable partitions {:?} do not sum to total memory {}",
                self.variable_partitions, self.total_memory
            )));
        }

        Ok(())
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> MemoryResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MemoryError::configuration(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> MemoryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MemoryError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&json)?;
        info!("Loaded memory configuration from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `PARTITION_SIM_CONFIG`, or use defaults
    pub fn from_env() -> MemoryResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }
}
