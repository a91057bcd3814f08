/*!
 * Simulator Limits and Constants
 *
 * Default geometry of the simulated address space. Every value here can be
 * overridden through `MemoryConfig`; these are only the defaults.
 */

use super::types::{Size, KIB, MIB};

// =============================================================================
// ADDRESS SPACE
// =============================================================================

/// Total simulated address space (16MB)
pub const DEFAULT_TOTAL_MEMORY: Size = 16 * MIB;

/// Size of every partition in fixed mode (2MB, giving 8 partitions)
pub const DEFAULT_FIXED_PARTITION: Size = 2 * MIB;

/// Partition sizes for variable mode, laid out in this order
/// Must sum to `DEFAULT_TOTAL_MEMORY`
pub const DEFAULT_VARIABLE_PARTITIONS: [Size; 5] = [MIB, 2 * MIB, 3 * MIB, 4 * MIB, 6 * MIB];

// =============================================================================
// PROGRAM CATALOG
// =============================================================================

/// Programs available before any custom definition
pub const DEFAULT_PROGRAMS: [(&str, Size); 6] = [
    ("Operating System", 2 * MIB),
    ("NotePad", MIB),
    ("Word", 4 * MIB),
    ("Excel", 3 * MIB),
    ("VSCode", 5 * MIB),
    ("Paint", 512 * KIB),
];

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Events retained by the collector before the oldest are dropped
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;
