//! Batched population of a destination table or collection.
//!
//! Every seeding routine follows the same loop: generate a row, add it to the
//! pending batch, and hand the batch to a [`BatchSink`] once it is full or the
//! run's quota is met. Two variants exist:
//! - [`BatchRun::plain`]: every generated row is written as-is.
//! - [`BatchRun::merged`]: rows sharing a [`Merge::key`] are folded together
//!   inside the batch before it is written.
//!
//! [`KeyRegistry`] complements these by rejecting keys already produced
//! earlier in the run.

mod keys;
mod runner;

pub use keys::KeyRegistry;
pub use runner::{BatchRun, BatchSink, FlushReport, Merge, RunSummary};
