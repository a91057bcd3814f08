/*!
 * Monitoring Module
 * Event journal and structured tracing
 */

pub mod collection;
pub mod events;
pub mod tracer;

pub use collection::Collector;
pub use events::{Event, Payload, Severity};
pub use tracer::{init_tracing, OperationSpan};
