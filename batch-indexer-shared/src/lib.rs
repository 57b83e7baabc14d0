//! # Batch Indexer Shared
//!
//! Plain data types passed between the batch indexer crates: the events fed
//! into the pipeline and the pending operations accumulated for a bulk request.

mod event;
mod operation;

pub use event::IndexEvent;
pub use operation::PendingOperation;
