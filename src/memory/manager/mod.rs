/*!
 * Memory Manager
 *
 * Partition-table simulator for classical contiguous allocation schemes.
 *
 * ## Partitioning Modes
 *
 * - **Fixed**: equal-size static partitions; first-fit, no splitting
 * - **Variable**: static partitions of configured sizes; first-fit, no splitting
 * - **Dynamic**: one free block carved on demand with first/best/worst-fit;
 *   released blocks are coalesced with free neighbours
 * - **Compaction**: dynamic partitioning that compacts memory on request, and
 *   once automatically when an allocation would otherwise fail
 *
 * ## Features
 *
 * - **Explicit state**: mode, policy, table and owner-id counter live in one
 *   struct mutated through `&mut self`
 * - **All-or-nothing operations**: failures leave the table untouched
 * - **Snapshots**: every mutation returns an owned copy of the table
 * - **Event journal**: optional bounded collector of state changes
 */

mod allocator;
mod lifecycle;

use super::config::MemoryConfig;
use super::registry::ProcessRegistry;
use super::table::PartitionTable;
use super::traits::MemoryInfo;
use super::types::{
    Block, MemoryResult, MemoryStats, PartitionMode, PlacementPolicy, ProgramDefinition, Snapshot,
};
use crate::core::types::OwnerId;
use crate::monitoring::{Collector, Event, OperationSpan};
use log::info;

/// Simulator state: configuration, mode, policy, table and registry
#[derive(Debug)]
pub struct MemoryManager {
    config: MemoryConfig,
    mode: PartitionMode,
    policy: PlacementPolicy,
    table: PartitionTable,
    registry: ProcessRegistry,
    // Observability journal for state changes
    collector: Option<Collector>,
}

impl MemoryManager {
    /// Create a manager in fixed mode with first-fit placement
    ///
    /// Fails with `MemoryError::Configuration` if `config` cannot tile the
    /// address space in every mode.
    pub fn new(config: MemoryConfig) -> MemoryResult<Self> {
        config.validate()?;

        let mode = PartitionMode::Fixed;
        let table = PartitionTable::for_mode(mode, &config);
        info!(
            "Memory manager initialized with {} bytes in {} mode ({} partitions)",
            config.total_memory,
            mode,
            table.len()
        );

        Ok(Self {
            config,
            mode,
            policy: PlacementPolicy::default(),
            table,
            registry: ProcessRegistry::new(),
            collector: None,
        })
    }

    /// Start in `mode` instead of fixed
    pub fn with_mode(mut self, mode: PartitionMode) -> Self {
        self.set_mode(mode);
        self
    }

    pub fn with_policy(mut self, policy: PlacementPolicy) -> Self {
        self.set_policy(policy);
        self
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Collector) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Take recorded events, leaving the journal empty
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.collector
            .as_mut()
            .map(Collector::drain)
            .unwrap_or_default()
    }

    /// Events lost because the journal was full
    pub fn dropped_events(&self) -> u64 {
        self.collector.as_ref().map_or(0, Collector::dropped)
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn mode(&self) -> PartitionMode {
        self.mode
    }

    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    pub fn table(&self) -> &PartitionTable {
        &self.table
    }

    pub fn programs(&self) -> &[ProgramDefinition] {
        self.registry.programs()
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Block currently held by `owner`
    pub fn block_of(&self, owner: &OwnerId) -> Option<&Block> {
        self.table.block_of(owner)
    }

    /// Owned copy of the current table
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            policy: self.policy,
            total_memory: self.table.total_memory(),
            blocks: self.table.blocks().to_vec(),
        }
    }

    pub(super) fn emit(&mut self, event: impl Into<Event>) {
        if let Some(collector) = self.collector.as_mut() {
            collector.emit(event);
        }
    }

    pub(super) fn span(&self, operation: &'static str) -> OperationSpan {
        OperationSpan::new(operation, self.mode.as_str(), self.policy.as_str())
    }

    /// Check the table after a mutation (debug builds only)
    pub(super) fn debug_check(&self) {
        debug_assert!(
            self.table.check_invariants(self.mode).is_ok(),
            "partition table invariant broken: {:?}",
            self.table.check_invariants(self.mode)
        );
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        self.table.stats()
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        let config = MemoryConfig::default();
        let table = PartitionTable::for_mode(PartitionMode::Fixed, &config);
        Self {
            config,
            mode: PartitionMode::Fixed,
            policy: PlacementPolicy::default(),
            table,
            registry: ProcessRegistry::new(),
            collector: None,
        }
    }
}
