/*!
 * Memory Traits
 * Placement and statistics abstractions
 */

use super::table::PartitionTable;
use super::types::{MemoryResult, MemoryStats};
use crate::core::types::{OwnerId, Size};

/// Placement strategy for one partitioning family
pub trait Allocator {
    /// Place `owner` in a block of at least `size` bytes
    ///
    /// Returns the index of the occupied block. On error the table is left
    /// untouched.
    fn place(&self, table: &mut PartitionTable, size: Size, owner: &OwnerId) -> MemoryResult<usize>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size) {
        let stats = self.stats();
        (stats.total_memory, stats.used_memory, stats.free_memory)
    }
}
