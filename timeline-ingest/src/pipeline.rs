//! One document through normalize -> resolve -> create -> build.
//!
//! The pipeline holds only the resolver, so one instance can be shared across
//! threads. Failures come back as `PipelineError` for the caller to count.

use std::collections::BTreeMap;

use timeline_core::TransactionRecord;

use crate::builders::ModelBuilderFactory;
use crate::error::{PipelineError, Skip};
use crate::normalize::normalize;
use crate::reader::{Reader, TIMELINE_DETAIL, TimelineEntry};
use crate::resolver::TypeResolver;
use crate::section::RawResponse;

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    resolver: TypeResolver,
}

impl Pipeline {
    pub fn new(resolver: TypeResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Classify and extract one already-decoded document.
    pub fn process(&self, event_type: &str, raw: &RawResponse) -> Result<TransactionRecord, PipelineError> {
        let normalization = normalize(raw)?;
        let response = normalization.response;
        let kind = self.resolver.resolve(event_type, &response)?;
        log::debug!("document {}: {} resolved to {}", raw.id, event_type, kind);

        let record = ModelBuilderFactory::create(kind, &response).build()?;
        Ok(record)
    }

    pub fn process_bytes(&self, id: &str, event_type: &str, bytes: &[u8]) -> Result<TransactionRecord, PipelineError> {
        let raw: RawResponse = serde_json::from_slice(bytes).map_err(|source| PipelineError::Decode {
            id: id.to_string(),
            source,
        })?;
        self.process(event_type, &raw)
    }

    /// Read an entry's detail document, then process it.
    pub fn fetch_and_process(
        &self,
        reader: &dyn Reader,
        entry: &TimelineEntry,
    ) -> Result<TransactionRecord, PipelineError> {
        let bytes = reader
            .read(TIMELINE_DETAIL, &entry.params())
            .map_err(|source| PipelineError::Reader {
                id: entry.id.clone(),
                source,
            })?;
        self.process_bytes(&entry.id, &entry.event_type, &bytes)
    }
}

/// Per-category outcome counts for a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    /// Skipped before the pipeline ran because the id was already exported
    pub known: usize,
    pub skipped: BTreeMap<&'static str, usize>,
}

impl BatchReport {
    /// Count one pipeline outcome, logging skips by severity.
    pub fn record(&mut self, id: &str, outcome: &Result<TransactionRecord, PipelineError>) {
        match outcome {
            Ok(_) => self.processed += 1,
            Err(e) => {
                let skip = e.skip();
                match skip {
                    Skip::Unsupported => log::info!("document {}: skipped ({})", id, e),
                    _ => log::warn!("document {}: skipped [{}] {}", id, skip.as_str(), e),
                }
                *self.skipped.entry(skip.as_str()).or_insert(0) += 1;
            }
        }
    }

    pub fn record_known(&mut self, id: &str) {
        log::debug!("document {}: already exported", id);
        self.known += 1;
    }

    pub fn skipped(&self, skip: Skip) -> usize {
        self.skipped.get(skip.as_str()).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} processed, {} already known", self.processed, self.known)?;
        for (reason, count) in &self.skipped {
            write!(f, ", {} {}", count, reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use anyhow::anyhow;
    use serde_json::{Map, Value, json};
    use std::collections::HashMap;
    use timeline_core::Kind;

    struct MapReader(HashMap<String, Vec<u8>>);

    impl Reader for MapReader {
        fn read(&self, document_type: &str, params: &Map<String, Value>) -> anyhow::Result<Vec<u8>> {
            assert_eq!(document_type, TIMELINE_DETAIL);
            let id = params.get("id").and_then(Value::as_str).unwrap_or_default();
            self.0.get(id).cloned().ok_or_else(|| anyhow!("no document {id}"))
        }
    }

    fn deposit_doc() -> Value {
        json!({
            "id": "dep-1",
            "sections": [{
                "type": "header",
                "title": "Du hast 500,00 € per Lastschrift hinzugefügt",
                "data": {"icon": "logos/bank/v2", "status": "executed", "timestamp": "2024-03-05T10:20:30.123+0000"}
            }]
        })
    }

    fn entry(id: &str, event_type: &str) -> TimelineEntry {
        TimelineEntry {
            id: id.to_string(),
            event_type: event_type.to_string(),
        }
    }

    #[test]
    fn test_fetch_and_process() {
        let reader = MapReader(HashMap::from([(
            "dep-1".to_string(),
            serde_json::to_vec(&deposit_doc()).unwrap(),
        )]));
        let pipeline = Pipeline::default();

        let record = pipeline
            .fetch_and_process(&reader, &entry("dep-1", "PAYMENT_INBOUND"))
            .unwrap();
        assert_eq!(record.kind, Kind::Deposit);
        assert_eq!(record.total, 500.0);

        let err = pipeline
            .fetch_and_process(&reader, &entry("missing", "PAYMENT_INBOUND"))
            .unwrap_err();
        assert_eq!(err.skip(), Skip::Unreadable);
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = Pipeline::default()
            .process_bytes("x", "PAYMENT_INBOUND", b"<html>")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_report_counts_each_category() {
        let pipeline = Pipeline::default();
        let raw: RawResponse = serde_json::from_value(deposit_doc()).unwrap();
        let mut report = BatchReport::default();

        report.record("dep-1", &pipeline.process("PAYMENT_INBOUND", &raw));
        report.record("dep-1", &pipeline.process("DOCUMENTS_ACCEPTED", &raw));
        report.record("dep-1", &pipeline.process("ORDER_EXECUTED", &raw));
        report.record_known("old");

        assert_eq!(report.processed, 1);
        assert_eq!(report.known, 1);
        assert_eq!(report.skipped(Skip::Unsupported), 2);
        assert_eq!(report.skipped(Skip::InsufficientData), 0);
        assert_eq!(report.total_skipped(), 2);
        assert_eq!(report.to_string(), "1 processed, 1 already known, 2 unsupported");
    }

    #[test]
    fn test_unsupported_keeps_event_type() {
        let raw: RawResponse = serde_json::from_value(deposit_doc()).unwrap();
        let err = Pipeline::default().process("DOCUMENTS_ACCEPTED", &raw).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Resolve(ResolveError::UnsupportedType { ref event_type }) if event_type == "DOCUMENTS_ACCEPTED"
        ));
    }
}
