/*!
 * Event Collection
 */

mod collector;

pub use collector::Collector;
