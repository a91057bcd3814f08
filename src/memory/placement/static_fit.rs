/*!
 * Static Partition Allocator
 * First-fit placement into fixed or variable partitions
 */

use super::no_fit;
use crate::core::types::{OwnerId, Size};
use crate::memory::table::PartitionTable;
use crate::memory::traits::Allocator;
use crate::memory::types::MemoryResult;
use log::{info, warn};

/// First-fit allocator for static partitions
///
/// Partitions are never split or merged, so best/worst-fit are not offered:
/// the first free partition large enough takes the whole request.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAllocator;

impl StaticAllocator {
    pub fn new() -> Self {
        Self
    }
}

impl Allocator for StaticAllocator {
    fn place(&self, table: &mut PartitionTable, size: Size, owner: &OwnerId) -> MemoryResult<usize> {
        let index = match table
            .blocks
            .iter()
            .position(|b| b.free && b.size >= size)
        {
            Some(index) => index,
            None => {
                warn!("No static partition can hold {} bytes for {}", size, owner);
                return Err(no_fit(table, size));
            }
        };

        let block = &mut table.blocks[index];
        block.occupy(owner.clone(), Some(size));
        info!(
            "Placed {} ({} bytes) in partition {} at 0x{:x}, {} bytes internal fragmentation",
            owner,
            size,
            index,
            block.start,
            block.size - size
        );
        Ok(index)
    }

    fn name(&self) -> &'static str {
        "static-first-fit"
    }
}
