/*!
 * Simulation Lifecycle
 * Mode and policy switches, resets and program definitions
 */

use super::MemoryManager;
use crate::core::types::{ProgramId, Size};
use crate::memory::table::PartitionTable;
use crate::memory::types::{
    MemoryResult, PartitionMode, PlacementPolicy, ProgramDefinition, Snapshot,
};
use crate::monitoring::Payload;
use log::{debug, info};

impl MemoryManager {
    /// Switch partitioning mode, discarding every process
    ///
    /// The owner-id sequence carries on; only [`MemoryManager::reset`]
    /// rewinds it.
    pub fn set_mode(&mut self, mode: PartitionMode) -> Snapshot {
        let span = self.span("set_mode");
        let _entered = span.enter();

        let discarded = self.table.allocated_blocks().count();
        self.mode = mode;
        self.table = PartitionTable::for_mode(mode, &self.config);
        info!(
            "Switched to {} mode with {} partitions, discarded {} processes",
            mode,
            self.table.len(),
            discarded
        );
        self.emit(Payload::ModeChanged { mode });
        self.debug_check();
        self.snapshot()
    }

    /// Choose the placement policy for dynamic modes
    ///
    /// Static partitions always use first-fit, so in fixed and variable
    /// mode the policy is only remembered for a later mode switch.
    pub fn set_policy(&mut self, policy: PlacementPolicy) {
        if self.policy == policy {
            return;
        }
        self.policy = policy;
        if self.mode.is_static() {
            debug!(
                "Placement policy set to {}-fit, inactive in {} mode",
                policy, self.mode
            );
        } else {
            info!("Placement policy set to {}-fit", policy);
        }
        self.emit(Payload::PolicyChanged { policy });
    }

    /// Start a new simulation in the current mode
    ///
    /// Clears the table and restarts owner ids at 1. Defined programs are kept.
    pub fn reset(&mut self) -> Snapshot {
        let span = self.span("reset");
        let _entered = span.enter();

        self.registry.reset();
        self.table = PartitionTable::for_mode(self.mode, &self.config);
        info!("Simulation reset in {} mode", self.mode);
        self.emit(Payload::SimulationReset { mode: self.mode });
        self.debug_check();
        self.snapshot()
    }

    /// Register a custom program for later allocation
    pub fn define_program(&mut self, name: &str, size: Size) -> MemoryResult<ProgramId> {
        let id = self.registry.define(name, size)?;
        if let Some(program) = self.registry.get(id) {
            let event = Payload::ProgramDefined {
                id,
                name: program.name.clone(),
                size: program.size,
            };
            self.emit(event);
        }
        Ok(id)
    }

    /// Register a custom program sized in (possibly fractional) MB
    pub fn define_program_mib(&mut self, name: &str, mib: f64) -> MemoryResult<ProgramId> {
        let size = ProgramDefinition::bytes_from_mib(mib)?;
        self.define_program(name, size)
    }
}
