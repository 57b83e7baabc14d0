//! Batch accumulation.
//!
//! Collects pending index operations until the driver decides to submit them.

mod accumulator;

pub use accumulator::BatchAccumulator;
