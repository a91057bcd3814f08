/*!
 * Core Module
 * Fundamental simulator types and constants
 */

pub mod limits;
pub mod serde;
pub mod types;

// Re-export for convenience
pub use types::*;
