//! Source of raw detail documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document type requested for a transaction detail
pub const TIMELINE_DETAIL: &str = "timelineDetailV2";

/// Fetches raw document bytes. Transport, sessions and retries are the
/// implementor's concern; an error is fatal for that one document only.
pub trait Reader: Send + Sync {
    fn read(&self, document_type: &str, params: &Map<String, Value>) -> anyhow::Result<Vec<u8>>;
}

/// One entry of the timeline index: a detail id plus its event-type tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: String,
    #[serde(rename = "eventType")]
    pub event_type: String,
}

impl TimelineEntry {
    /// Reader params for this entry's detail document
    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("id".to_string(), Value::String(self.id.clone()));
        params
    }
}
