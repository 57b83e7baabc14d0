//! Backend connection management.
//!
//! The connection manager owns the single live backend client and rebuilds it
//! after transport failures, so the submitter never has to know how clients
//! are created.

mod handle;
mod manager;

pub use handle::ConnectionHandle;
pub use manager::{ConnectionManager, ReconnectPolicy, ReconnectingConnectionManager};
