/*!
 * Free Block Coalescing
 * Merges runs of adjacent free blocks after a release
 */

use super::table::PartitionTable;
use log::info;

/// Merge every run of consecutive free blocks into one
///
/// Single left-to-right pass: after a merge the same position is examined
/// again, so a run of any length collapses into its first member. Returns
/// the number of merges performed.
pub fn coalesce(table: &mut PartitionTable) -> usize {
    let blocks = &mut table.blocks;
    let before = blocks.len();

    let mut i = 0;
    let mut merged = 0;
    while i + 1 < blocks.len() {
        if blocks[i].free && blocks[i + 1].free {
            let next_size = blocks[i + 1].size;
            blocks[i].size += next_size;
            blocks.remove(i + 1);
            merged += 1;
        } else {
            i += 1;
        }
    }

    if merged > 0 {
        info!(
            "Coalesced {} pairs of adjacent free blocks, reduced from {} to {} blocks",
            merged,
            before,
            blocks.len()
        );
    }

    merged
}
