/*!
 * Partition Table
 * Ordered, gap-free sequence of blocks covering the address space
 */

use super::config::MemoryConfig;
use super::traits::MemoryInfo;
use super::types::{Block, MemoryError, MemoryResult, MemoryStats, PartitionMode};
use crate::core::types::{OwnerId, Size};

/// The simulator's only data structure
///
/// Blocks are kept in ascending `start` order, each one starting where the
/// previous one ends, and together they span exactly `total_memory` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    pub(super) blocks: Vec<Block>,
    total_memory: Size,
}

impl PartitionTable {
    /// Build a fresh, fully free table laid out for `mode`
    ///
    /// `config` must already be validated.
    pub fn for_mode(mode: PartitionMode, config: &MemoryConfig) -> Self {
        let blocks = match mode {
            PartitionMode::Fixed => {
                let size = config.fixed_partition_size;
                (0..config.fixed_partition_count())
                    .map(|i| Block::free(i * size, size))
                    .collect()
            }
            PartitionMode::Variable => {
                let mut start = 0;
                config
                    .variable_partitions
                    .iter()
                    .map(|&size| {
                        let block = Block::free(start, size);
                        start += size;
                        block
                    })
                    .collect()
            }
            PartitionMode::Dynamic | PartitionMode::Compaction => {
                vec![Block::free(0, config.total_memory)]
            }
        };

        Self {
            blocks,
            total_memory: config.total_memory,
        }
    }

    /// Wrap an explicit block list, checking it against `mode`
    pub fn from_blocks(
        blocks: Vec<Block>,
        total_memory: Size,
        mode: PartitionMode,
    ) -> MemoryResult<Self> {
        let table = Self {
            blocks,
            total_memory,
        };
        table.check_invariants(mode)?;
        Ok(table)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn total_memory(&self) -> Size {
        self.total_memory
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Index of the block held by `owner`
    pub fn position_of(&self, owner: &OwnerId) -> Option<usize> {
        self.blocks.iter().position(|b| b.is_owned_by(owner))
    }

    pub fn block_of(&self, owner: &OwnerId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.is_owned_by(owner))
    }

    /// Free blocks with their indices, in address order
    pub fn free_blocks(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate().filter(|(_, b)| b.free)
    }

    pub fn allocated_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_allocated())
    }

    /// Free the block held by `owner`; returns its index
    ///
    /// Neighbouring free blocks are left alone; merging them is the
    /// coalescer's job and only applies to dynamic modes.
    pub fn release(&mut self, owner: &OwnerId) -> MemoryResult<usize> {
        let index = self
            .position_of(owner)
            .ok_or_else(|| MemoryError::NotFound(owner.clone()))?;
        self.blocks[index].release();
        Ok(index)
    }

    /// Replace the block list wholesale (compaction)
    pub(super) fn replace_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
    }

    /// Verify every structural rule of the table
    ///
    /// Static modes are exempt from the adjacent-free rule since their
    /// partition boundaries never move.
    pub fn check_invariants(&self, mode: PartitionMode) -> MemoryResult<()> {
        let violation = |reason: String| Err(MemoryError::InvariantViolation(reason));

        if self.blocks.is_empty() {
            return violation("table has no blocks".to_string());
        }

        let mut expected_start = 0;
        let mut owners: Vec<&OwnerId> = Vec::new();

        for (i, block) in self.blocks.iter().enumerate() {
            if block.start != expected_start {
                return violation(format!(
                    "block {} starts at 0x{:x}, expected 0x{:x}",
                    i, block.start, expected_start
                ));
            }
            if block.size == 0 {
                return violation(format!("block {} at 0x{:x} has zero size", i, block.start));
            }

            match (&block.owner, block.free) {
                (Some(_), true) => {
                    return violation(format!("free block {} still has an owner", i));
                }
                (None, false) => {
                    return violation(format!("occupied block {} has no owner", i));
                }
                (Some(owner), false) => {
                    if owners.contains(&owner) {
                        return violation(format!("owner {} holds more than one block", owner));
                    }
                    owners.push(owner);
                }
                (None, true) => {}
            }

            match block.payload {
                Some(_) if block.free => {
                    return violation(format!("free block {} carries a payload", i));
                }
                Some(_) if mode.is_dynamic() => {
                    return violation(format!(
                        "block {} carries a payload in {} mode",
                        i, mode
                    ));
                }
                Some(payload) if payload > block.size => {
                    return violation(format!(
                        "block {} payload {} exceeds its size {}",
                        i, payload, block.size
                    ));
                }
                _ => {}
            }

            if mode.is_dynamic() && i > 0 && block.free && self.blocks[i - 1].free {
                return violation(format!("blocks {} and {} are both free", i - 1, i));
            }

            expected_start = block.end();
        }

        if expected_start != self.total_memory {
            return violation(format!(
                "blocks cover {} bytes, total memory is {}",
                expected_start, self.total_memory
            ));
        }

        Ok(())
    }
}

impl MemoryInfo for PartitionTable {
    fn stats(&self) -> MemoryStats {
        let mut used = 0;
        let mut allocated_blocks = 0;
        let mut free_blocks = 0;
        let mut largest_free = 0;
        let mut internal = 0;

        for block in &self.blocks {
            if block.free {
                free_blocks += 1;
                largest_free = largest_free.max(block.size);
            } else {
                allocated_blocks += 1;
                used += block.size;
                internal += block.internal_fragmentation().unwrap_or(0);
            }
        }

        let free = self.total_memory - used;
        MemoryStats {
            total_memory: self.total_memory,
            used_memory: used,
            free_memory: free,
            usage_percentage: (used as f64 / self.total_memory as f64) * 100.0,
            allocated_blocks,
            free_blocks,
            largest_free_block: largest_free,
            internal_fragmentation: internal,
            external_fragmentation: free - largest_free,
        }
    }
}
