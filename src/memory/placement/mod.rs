/*!
 * Placement Strategies
 *
 * - **Static** (fixed/variable partitions): first-fit into immutable
 *   partitions; the unused tail is internal fragmentation.
 * - **Dynamic** (dynamic/compaction modes): first/best/worst-fit, splitting
 *   the chosen block to the exact request.
 */

mod dynamic_fit;
mod static_fit;

pub use dynamic_fit::{select_candidate, DynamicAllocator};
pub use static_fit::StaticAllocator;

use super::table::PartitionTable;
use super::types::MemoryError;
use crate::core::types::Size;

/// Failure raised when no free block can hold `requested` bytes
pub(crate) fn no_fit(table: &PartitionTable, requested: Size) -> MemoryError {
    let largest_free = table
        .free_blocks()
        .map(|(_, b)| b.size)
        .max()
        .unwrap_or(0);
    MemoryError::NoFit {
        requested,
        largest_free,
    }
}
