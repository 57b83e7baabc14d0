//! Event resolver implementation.
//!
//! Fills in defaults for events that do not name their target index, type or
//! identifier.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use batch_indexer_shared::IndexEvent;

/// Defaults applied to incoming events.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Index used when an event does not name one.
    pub default_index: String,
    /// Document type used when an event does not name one.
    pub default_type: String,
    /// Append the current UTC date (`-YYYY.MM.DD`) to every index name.
    pub index_date_suffix: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_index: "events".to_string(),
            default_type: "_doc".to_string(),
            index_date_suffix: false,
        }
    }
}

/// An event with every target field decided.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent {
    pub payload: String,
    pub index: String,
    pub doc_type: String,
    pub id: String,
    pub routing: Option<String>,
}

/// Turns raw events into fully addressed ones.
#[derive(Debug, Clone, Default)]
pub struct EventResolver {
    config: ResolverConfig,
}

impl EventResolver {
    /// Create a resolver with the given defaults.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve an event using the current time for date suffixes.
    pub fn resolve(&self, event: IndexEvent) -> ResolvedEvent {
        self.resolve_at(event, Utc::now())
    }

    /// Resolve an event as of `now`.
    ///
    /// Events without an identifier get a random UUID, so resubmitting the
    /// same resolved event overwrites rather than duplicates the document.
    pub fn resolve_at(&self, event: IndexEvent, now: DateTime<Utc>) -> ResolvedEvent {
        let payload = event.payload();

        let base_index = event
            .index
            .unwrap_or_else(|| self.config.default_index.clone());
        let index = if self.config.index_date_suffix {
            format!("{}-{}", base_index, now.format("%Y.%m.%d"))
        } else {
            base_index
        };

        ResolvedEvent {
            payload,
            index,
            doc_type: event
                .doc_type
                .unwrap_or_else(|| self.config.default_type.clone()),
            id: event.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            routing: event.routing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let resolver = EventResolver::new(ResolverConfig {
            default_index: "logs".to_string(),
            default_type: "entry".to_string(),
            index_date_suffix: false,
        });

        let resolved = resolver.resolve(IndexEvent::new(json!({"msg": "hi"})));

        assert_eq!(resolved.index, "logs");
        assert_eq!(resolved.doc_type, "entry");
        assert!(Uuid::parse_str(&resolved.id).is_ok());
        assert!(resolved.routing.is_none());
        assert_eq!(resolved.payload, r#"{"msg":"hi"}"#);
    }

    #[test]
    fn test_event_values_win() {
        let resolver = EventResolver::default();
        let event = IndexEvent::new(json!({}))
            .with_index("custom")
            .with_id("abc")
            .with_routing("tenant-7");

        let resolved = resolver.resolve(event);

        assert_eq!(resolved.index, "custom");
        assert_eq!(resolved.id, "abc");
        assert_eq!(resolved.routing.as_deref(), Some("tenant-7"));
    }

    #[test]
    fn test_date_suffix() {
        let resolver = EventResolver::new(ResolverConfig {
            index_date_suffix: true,
            ..ResolverConfig::default()
        });
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();

        let resolved = resolver.resolve_at(IndexEvent::new(json!({})).with_index("logs"), now);

        assert_eq!(resolved.index, "logs-2024.03.07");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let resolver = EventResolver::default();

        let a = resolver.resolve(IndexEvent::new(json!({})));
        let b = resolver.resolve(IndexEvent::new(json!({})));

        assert_ne!(a.id, b.id);
    }
}
