//! Error types for the batch indexer repository.

mod backend_error;
mod request_error;

pub use backend_error::BackendError;
pub use request_error::RequestError;
