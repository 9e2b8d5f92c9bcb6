//! Document references: one per downloadable entry of the Documents section.
//!
//! Storage path: `{YYYY-MM}/{parent_id}/{title}.pdf`, where the month comes
//! from the entry's own date or, if that does not parse, the parent timestamp.

use chrono::{DateTime, FixedOffset, NaiveDate};
use timeline_core::DocumentReference;
use url::Url;

use crate::section::{DocumentEntry, DocumentsSection};

const DATE_FORMATS: [&str; 4] = ["%d.%m.%y", "%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Build references for every entry whose action payload is a plain URL.
pub fn build_references(
    parent_id: &str,
    parent_timestamp: DateTime<FixedOffset>,
    documents: &DocumentsSection,
) -> Vec<DocumentReference> {
    documents
        .data
        .iter()
        .filter_map(|entry| build_reference(parent_id, parent_timestamp, entry))
        .collect()
}

fn build_reference(
    parent_id: &str,
    parent_timestamp: DateTime<FixedOffset>,
    entry: &DocumentEntry,
) -> Option<DocumentReference> {
    let Some(url) = entry.action.as_ref().and_then(|a| a.payload_str()) else {
        log::debug!("document {}: entry '{}' has no URL payload, skipped", parent_id, entry.title);
        return None;
    };
    if let Err(e) = Url::parse(url) {
        log::debug!("document {}: entry '{}' payload is not a URL ({}), skipped", parent_id, entry.title, e);
        return None;
    }

    let date = parse_document_date(&entry.detail).unwrap_or_else(|| parent_timestamp.date_naive());

    Some(DocumentReference {
        id: entry.id.clone(),
        parent_id: parent_id.to_string(),
        url: url.to_string(),
        date: entry.detail.clone(),
        title: entry.title.clone(),
        path: storage_path(date, parent_id, &entry.title),
    })
}

fn parse_document_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// `{YYYY-MM}/{parent_id}/{title}.pdf`; path separators in id and title become `_`.
pub fn storage_path(date: NaiveDate, parent_id: &str, title: &str) -> String {
    format!(
        "{}/{}/{}.pdf",
        date.format("%Y-%m"),
        path_segment(parent_id),
        path_segment(title)
    )
}

fn path_segment(text: &str) -> String {
    text.trim().replace(['/', '\\'], "_")
}
