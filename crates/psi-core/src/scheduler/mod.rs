//! Batch scheduler: fixed concurrency windows with a pause between them.
//!
//! Items run in consecutive chunks of `concurrency`. Every item of a chunk
//! is in flight at once, and a chunk settles completely before the next one
//! starts. Results come back in input order.

mod batch;
mod summary;

pub use batch::{process_all, BatchOptions, DEFAULT_BATCH_DELAY, DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
pub use summary::BatchSummary;
