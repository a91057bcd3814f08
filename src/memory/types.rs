/*!
 * Memory Types
 * Common types for the partition simulator
 */

use crate::core::serde::is_none;
use crate::core::types::{Address, OwnerId, ProgramId, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("No free partition can hold {requested} bytes (largest free block: {largest_free} bytes)")]
    #[diagnostic(
        code(memory::no_fit),
        help("Release a process, switch placement policy, or compact memory in compaction mode.")
    )]
    NoFit { requested: Size, largest_free: Size },

    #[error("Process {0} not found")]
    #[diagnostic(
        code(memory::not_found),
        help("The process may have been released already. Check the owner id in the snapshot.")
    )]
    NotFound(OwnerId),

    #[error("Invalid memory configuration: {0}")]
    #[diagnostic(
        code(memory::configuration),
        help("Partition sizes must be non-zero and cover the total memory exactly.")
    )]
    Configuration(String),

    #[error("Invalid input: {0}")]
    #[diagnostic(code(memory::invalid_input))]
    InvalidInput(String),

    #[error("Program {0} is not defined")]
    #[diagnostic(
        code(memory::unknown_program),
        help("List the catalog with `programs` or define a new program first.")
    )]
    UnknownProgram(String),

    #[error("Operation {operation} is not supported in {mode} mode")]
    #[diagnostic(code(memory::unsupported_operation))]
    UnsupportedOperation {
        operation: &'static str,
        mode: PartitionMode,
    },

    #[error("Partition table invariant violated: {0}")]
    #[diagnostic(code(memory::invariant_violation))]
    InvariantViolation(String),
}

impl MemoryError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Whether the caller can keep using the simulator after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            MemoryError::Configuration(_) | MemoryError::InvariantViolation(_)
        )
    }
}

/// How the address space is divided into partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMode {
    /// Equal-size static partitions
    Fixed,
    /// Static partitions of configured, distinct sizes
    Variable,
    /// Partitions carved out of free space on demand
    Dynamic,
    /// Dynamic partitioning with compaction on demand or on allocation failure
    Compaction,
}

impl PartitionMode {
    pub const ALL: [PartitionMode; 4] = [
        PartitionMode::Fixed,
        PartitionMode::Variable,
        PartitionMode::Dynamic,
        PartitionMode::Compaction,
    ];

    /// Static partitions never split or merge
    pub fn is_static(self) -> bool {
        matches!(self, PartitionMode::Fixed | PartitionMode::Variable)
    }

    pub fn is_dynamic(self) -> bool {
        !self.is_static()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PartitionMode::Fixed => "fixed",
            PartitionMode::Variable => "variable",
            PartitionMode::Dynamic => "dynamic",
            PartitionMode::Compaction => "compaction",
        }
    }
}

impl fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionMode {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(PartitionMode::Fixed),
            "variable" => Ok(PartitionMode::Variable),
            "dynamic" => Ok(PartitionMode::Dynamic),
            "compaction" => Ok(PartitionMode::Compaction),
            other => Err(MemoryError::invalid_input(format!(
                "unknown partition mode '{}'",
                other
            ))),
        }
    }
}

/// Which free block a dynamic allocation carves from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Lowest-address block that fits
    #[default]
    First,
    /// Smallest block that fits
    Best,
    /// Largest block that fits
    Worst,
}

impl PlacementPolicy {
    pub const ALL: [PlacementPolicy; 3] = [
        PlacementPolicy::First,
        PlacementPolicy::Best,
        PlacementPolicy::Worst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlacementPolicy::First => "first",
            PlacementPolicy::Best => "best",
            PlacementPolicy::Worst => "worst",
        }
    }
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementPolicy {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-fit" => Ok(PlacementPolicy::First),
            "best" | "best-fit" => Ok(PlacementPolicy::Best),
            "worst" | "worst-fit" => Ok(PlacementPolicy::Worst),
            other => Err(MemoryError::invalid_input(format!(
                "unknown placement policy '{}'",
                other
            ))),
        }
    }
}

/// One contiguous region of the simulated address space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub start: Address,
    pub size: Size,
    pub free: bool,
    #[serde(default, skip_serializing_if = "is_none")]
    pub owner: Option<OwnerId>,
    /// Bytes actually requested by the owner; static modes only
    #[serde(default, skip_serializing_if = "is_none")]
    pub payload: Option<Size>,
}

impl Block {
    pub fn free(start: Address, size: Size) -> Self {
        Self {
            start,
            size,
            free: true,
            owner: None,
            payload: None,
        }
    }

    /// Occupied block sized exactly to its owner (dynamic modes)
    pub fn occupied(start: Address, size: Size, owner: OwnerId) -> Self {
        Self {
            start,
            size,
            free: false,
            owner: Some(owner),
            payload: None,
        }
    }

    /// First address past the end of the block
    pub fn end(&self) -> Address {
        self.start + self.size
    }

    pub fn is_allocated(&self) -> bool {
        !self.free
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        self.owner.as_ref() == Some(owner)
    }

    /// Hand the block to `owner`, recording `payload` when partitions are static
    pub fn occupy(&mut self, owner: OwnerId, payload: Option<Size>) {
        self.free = false;
        self.owner = Some(owner);
        self.payload = payload;
    }

    /// Return the block to the free pool, dropping owner and payload
    pub fn release(&mut self) -> Option<OwnerId> {
        self.free = true;
        self.payload = None;
        self.owner.take()
    }

    /// Unused tail of a static partition
    pub fn internal_fragmentation(&self) -> Option<Size> {
        self.payload.map(|payload| self.size - payload)
    }
}

/// Read-only copy of the partition table handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: PartitionMode,
    pub policy: PlacementPolicy,
    pub total_memory: Size,
    pub blocks: Vec<Block>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn free_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.free)
    }

    pub fn block_of(&self, owner: &OwnerId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.is_owned_by(owner))
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    /// Sum of unused partition tails in static modes
    pub internal_fragmentation: Size,
    /// Free bytes unusable by a request as large as all free memory
    pub external_fragmentation: Size,
}

/// Program that can be launched into the simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDefinition {
    pub id: ProgramId,
    pub name: String,
    pub size: Size,
}
