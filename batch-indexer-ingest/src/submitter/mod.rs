//! Bulk submission.
//!
//! Sends an accumulated batch to the backend and decides what the outcome
//! means for the batch and the connection.

mod bulk_submitter;
mod result;

pub use bulk_submitter::BulkSubmitter;
pub use result::{ItemFailure, ItemOutcome, SubmissionResult, SubmissionStatus};
