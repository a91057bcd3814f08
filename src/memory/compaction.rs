/*!
 * Memory Compaction
 * Slides occupied blocks to the bottom of the address space
 */

use super::table::PartitionTable;
use super::types::Block;
use crate::core::types::Size;
use log::info;
use serde::{Deserialize, Serialize};

/// Outcome of one compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompactionReport {
    /// Occupied blocks whose start offset changed
    pub relocated_blocks: usize,
    /// Bytes of the single trailing free block
    pub free_tail: Size,
}

/// Lay occupied blocks out contiguously from offset 0
///
/// Relative order, owners and sizes are preserved; only `start` changes. The
/// remaining space becomes one trailing free block. A table with nothing
/// occupied becomes a single free block spanning the whole space.
pub fn compact(table: &mut PartitionTable) -> CompactionReport {
    let total = table.total_memory();
    let mut compacted: Vec<Block> = Vec::with_capacity(table.len());
    let mut next_start = 0;
    let mut relocated_blocks = 0;

    for block in table.blocks().iter().filter(|b| b.is_allocated()) {
        let mut moved = block.clone();
        if moved.start != next_start {
            relocated_blocks += 1;
            moved.start = next_start;
        }
        next_start = moved.end();
        compacted.push(moved);
    }

    let free_tail = total - next_start;
    if free_tail > 0 {
        compacted.push(Block::free(next_start, free_tail));
    }

    table.replace_blocks(compacted);

    info!(
        "Compacted memory: relocated {} blocks, {} bytes free at 0x{:x}",
        relocated_blocks, free_tail, next_start
    );

    CompactionReport {
        relocated_blocks,
        free_tail,
    }
}
