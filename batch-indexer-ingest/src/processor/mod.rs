//! Processor module for the batch indexer ingest.
//!
//! Resolves incoming events into the index, type, identifier and routing the
//! batch accumulator needs.

mod event_resolver;

pub use event_resolver::{EventResolver, ResolvedEvent, ResolverConfig};
