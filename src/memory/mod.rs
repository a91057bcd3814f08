/*!
 * Memory Module
 * Partition table, placement strategies and the simulator state machine
 */

pub mod coalesce;
pub mod compaction;
pub mod config;
pub mod manager;
pub mod placement;
pub mod registry;
pub mod table;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use coalesce::coalesce;
pub use compaction::{compact, CompactionReport};
pub use config::MemoryConfig;
pub use manager::MemoryManager;
pub use placement::{select_candidate, DynamicAllocator, StaticAllocator};
pub use registry::ProcessRegistry;
pub use table::PartitionTable;
pub use traits::*;
pub use types::*;
