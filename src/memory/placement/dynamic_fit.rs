/*!
 * Dynamic Partition Allocator
 * First/best/worst-fit selection with exact-size block splitting
 */

use super::no_fit;
use crate::core::types::{OwnerId, Size};
use crate::memory::table::PartitionTable;
use crate::memory::traits::Allocator;
use crate::memory::types::{Block, MemoryResult, PlacementPolicy};
use log::{debug, info, warn};
use std::cmp::Reverse;

/// Pick the free block `policy` would carve `size` bytes from
///
/// Ties on size go to the lowest address.
pub fn select_candidate(
    table: &PartitionTable,
    size: Size,
    policy: PlacementPolicy,
) -> Option<usize> {
    let mut candidates = table.free_blocks().filter(|(_, b)| b.size >= size);

    let chosen = match policy {
        PlacementPolicy::First => candidates.next(),
        PlacementPolicy::Best => candidates.min_by_key(|(_, b)| (b.size, b.start)),
        PlacementPolicy::Worst => candidates.min_by_key(|(_, b)| (Reverse(b.size), b.start)),
    };

    chosen.map(|(index, _)| index)
}

/// Allocator for dynamic partitioning
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicAllocator {
    policy: PlacementPolicy,
}

impl DynamicAllocator {
    pub fn new(policy: PlacementPolicy) -> Self {
        Self { policy }
    }
}

impl Allocator for DynamicAllocator {
    fn place(&self, table: &mut PartitionTable, size: Size, owner: &OwnerId) -> MemoryResult<usize> {
        let index = match select_candidate(table, size, self.policy) {
            Some(index) => index,
            None => {
                warn!(
                    "No free block can hold {} bytes for {} ({}-fit)",
                    size, owner, self.policy
                );
                return Err(no_fit(table, size));
            }
        };

        let candidate = &table.blocks[index];
        let (start, available) = (candidate.start, candidate.size);

        if available == size {
            table.blocks[index].occupy(owner.clone(), None);
            info!(
                "Placed {} ({} bytes) at 0x{:x}, exact fit ({}-fit)",
                owner, size, start, self.policy
            );
        } else {
            let remainder = Block::free(start + size, available - size);
            table.blocks[index] = Block::occupied(start, size, owner.clone());
            table.blocks.insert(index + 1, remainder);
            info!(
                "Placed {} ({} bytes) at 0x{:x} ({}-fit)",
                owner, size, start, self.policy
            );
            debug!(
                "Split block: keeping {} bytes, {} bytes remain free at 0x{:x}",
                size,
                available - size,
                start + size
            );
        }

        Ok(index)
    }

    fn name(&self) -> &'static str {
        match self.policy {
            PlacementPolicy::First => "dynamic-first-fit",
            PlacementPolicy::Best => "dynamic-best-fit",
            PlacementPolicy::Worst => "dynamic-worst-fit",
        }
    }
}
