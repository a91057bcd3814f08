/*!
 * Event System
 * Strongly-typed simulator events
 */

use crate::core::serde::is_none;
use crate::core::types::{Address, OwnerId, ProgramId, Size};
use crate::memory::{PartitionMode, PlacementPolicy};
use serde::{Deserialize, Serialize};

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Severity {
    Debug = 1,
    Info = 2,
    Warn = 3,
}

/// Recorded simulator event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Position in the collector's stream, assigned on emit
    pub sequence: u64,
    pub severity: Severity,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Event {
    pub fn new(severity: Severity, payload: Payload) -> Self {
        Self {
            sequence: 0,
            severity,
            payload,
        }
    }
}

/// Event payload - one variant per state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Payload {
    ModeChanged {
        mode: PartitionMode,
    },
    PolicyChanged {
        policy: PlacementPolicy,
    },
    SimulationReset {
        mode: PartitionMode,
    },
    ProgramDefined {
        id: ProgramId,
        name: String,
        size: Size,
    },
    Allocated {
        owner: OwnerId,
        start: Address,
        size: Size,
        #[serde(default, skip_serializing_if = "is_none")]
        payload: Option<Size>,
    },
    AllocationFailed {
        program: String,
        requested: Size,
        largest_free: Size,
    },
    Released {
        owner: OwnerId,
        start: Address,
        size: Size,
    },
    Coalesced {
        merges: usize,
    },
    Compacted {
        relocated_blocks: usize,
        free_tail: Size,
        automatic: bool,
    },
}

impl Payload {
    /// Severity the manager records this payload with
    pub fn default_severity(&self) -> Severity {
        match self {
            Payload::AllocationFailed { .. } => Severity::Warn,
            Payload::Coalesced { .. } => Severity::Debug,
            _ => Severity::Info,
        }
    }
}

impl From<Payload> for Event {
    fn from(payload: Payload) -> Self {
        Event::new(payload.default_severity(), payload)
    }
}
