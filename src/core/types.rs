/*!
 * Core Types
 * Common types used across the simulator
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte offset inside the simulated address space
pub type Address = usize;

/// Byte count for memory operations
pub type Size = usize;

/// One kibibyte
pub const KIB: Size = 1024;

/// One mebibyte
pub const MIB: Size = 1024 * 1024;

/// Owner of an occupied partition, formatted as `<program>-<sequence>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Build the owner id issued for the `sequence`-th accepted request
    pub fn issue(program: &str, sequence: u64) -> Self {
        Self(format!("{}-{}", program, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for OwnerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for OwnerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Catalog identifier of a program definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub u32);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
