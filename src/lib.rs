/*!
 * Partition Simulator Library
 * Contiguous memory allocation schemes exposed as a library
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod shell;

// Re-exports
pub use crate::core::types::{Address, OwnerId, ProgramId, Size, KIB, MIB};
pub use memory::{
    Block, MemoryConfig, MemoryError, MemoryInfo, MemoryManager, MemoryResult, MemoryStats,
    PartitionMode, PartitionTable, PlacementPolicy, Snapshot,
};
pub use monitoring::{init_tracing, Collector};
pub use shell::{Command, Output};
