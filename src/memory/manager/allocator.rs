/*!
 * Memory Allocator Implementation
 * Allocation, release and compaction entry points
 */

use super::MemoryManager;
use crate::core::types::{OwnerId, ProgramId, Size};
use crate::memory::coalesce::coalesce;
use crate::memory::compaction::{compact, CompactionReport};
use crate::memory::placement::{DynamicAllocator, StaticAllocator};
use crate::memory::registry::validate_name;
use crate::memory::traits::Allocator;
use crate::memory::types::{MemoryError, MemoryResult, PartitionMode, Snapshot};
use crate::monitoring::Payload;
use log::{info, warn};

impl MemoryManager {
    /// Allocate `size` bytes for a new process of `program`
    ///
    /// The owner id is `<program>-<sequence>`. In compaction mode a failed
    /// placement triggers one compaction and a single retry; the compaction
    /// stays in effect even if the retry fails too.
    pub fn allocate(&mut self, program: &str, size: Size) -> MemoryResult<Snapshot> {
        let span = self.span("allocate");
        let _entered = span.enter();

        let result = self.allocate_block(program, size);
        span.record_outcome(&result);
        result.map(|_| self.snapshot())
    }

    /// Allocate a catalog program
    pub fn allocate_program(&mut self, id: ProgramId) -> MemoryResult<Snapshot> {
        let (name, size) = match self.registry.get(id) {
            Some(program) => (program.name.clone(), program.size),
            None => return Err(MemoryError::UnknownProgram(id.to_string())),
        };
        self.allocate(&name, size)
    }

    /// Allocate a catalog program looked up by id or name
    pub fn launch(&mut self, key: &str) -> MemoryResult<Snapshot> {
        let program = self.registry.lookup(key)?;
        let (name, size) = (program.name.clone(), program.size);
        self.allocate(&name, size)
    }

    /// Release the block held by `owner`
    ///
    /// In dynamic modes the freed block is merged with free neighbours;
    /// static partitions keep their boundaries.
    pub fn release(&mut self, owner: &str) -> MemoryResult<Snapshot> {
        let span = self.span("release");
        let _entered = span.enter();

        let result = self.release_block(owner);
        span.record_outcome(&result);
        result.map(|_| self.snapshot())
    }

    /// Compact memory on demand (compaction mode only)
    pub fn compact_now(&mut self) -> MemoryResult<Snapshot> {
        let span = self.span("compact");
        let _entered = span.enter();

        let result = self.compact_table(false);
        span.record_outcome(&result);
        result.map(|_| self.snapshot())
    }

    fn allocate_block(&mut self, program: &str, size: Size) -> MemoryResult<usize> {
        let program = validate_name(program)?;
        if size == 0 {
            return Err(MemoryError::invalid_input(
                "requested size must be greater than 0",
            ));
        }

        let owner = self.registry.peek_owner(program);
        let static_fit = StaticAllocator::new();
        let dynamic_fit = DynamicAllocator::new(self.policy);
        let allocator: &dyn Allocator = if self.mode.is_static() {
            &static_fit
        } else {
            &dynamic_fit
        };

        let mut outcome = allocator.place(&mut self.table, size, &owner);

        if self.mode == PartitionMode::Compaction
            && matches!(outcome, Err(MemoryError::NoFit { .. }))
        {
            info!(
                "No block fits {} bytes for {}, compacting memory and retrying",
                size, owner
            );
            self.compact_table(true)?;
            outcome = allocator.place(&mut self.table, size, &owner);
        }

        match outcome {
            Ok(index) => {
                self.registry.commit();
                let block = &self.table.blocks()[index];
                info!(
                    "Allocated {} bytes at 0x{:x} for {} ({})",
                    size,
                    block.start,
                    owner,
                    allocator.name()
                );
                let event = Payload::Allocated {
                    owner,
                    start: block.start,
                    size: block.size,
                    payload: block.payload,
                };
                self.emit(event);
                self.debug_check();
                Ok(index)
            }
            Err(err) => {
                if let MemoryError::NoFit {
                    requested,
                    largest_free,
                } = err
                {
                    warn!(
                        "Out of memory: {} requested {} bytes, largest free block is {} bytes",
                        program, requested, largest_free
                    );
                    self.emit(Payload::AllocationFailed {
                        program: program.to_string(),
                        requested,
                        largest_free,
                    });
                }
                Err(err)
            }
        }
    }

    fn release_block(&mut self, owner: &str) -> MemoryResult<usize> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(MemoryError::invalid_input("owner id must not be empty"));
        }
        let owner = OwnerId::from(owner);

        let index = match self.table.release(&owner) {
            Ok(index) => index,
            Err(err) => {
                warn!("Attempted to release unknown process {}", owner);
                return Err(err);
            }
        };

        let (start, size) = {
            let block = &self.table.blocks()[index];
            (block.start, block.size)
        };
        info!("Released {} bytes at 0x{:x} held by {}", size, start, owner);
        self.emit(Payload::Released { owner, start, size });

        if self.mode.is_dynamic() {
            let merges = coalesce(&mut self.table);
            if merges > 0 {
                self.emit(Payload::Coalesced { merges });
            }
        }

        self.debug_check();
        Ok(index)
    }

    fn compact_table(&mut self, automatic: bool) -> MemoryResult<CompactionReport> {
        if self.mode != PartitionMode::Compaction {
            return Err(MemoryError::UnsupportedOperation {
                operation: "compact",
                mode: self.mode,
            });
        }

        let report = compact(&mut self.table);
        self.emit(Payload::Compacted {
            relocated_blocks: report.relocated_blocks,
            free_tail: report.free_tail,
            automatic,
        });
        self.debug_check();
        Ok(report)
    }
}
