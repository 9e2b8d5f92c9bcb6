//! Wire shapes of a timeline detail document and its typed sections.
//!
//! Raw document:
//!   {"id": "...", "sections": [{"type": "header", ...}, {"type": "table", ...}, ...]}
//! Sections stay loosely typed (`serde_json::Map`) until the normalizer
//! re-decodes them into the structs below.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A timeline detail document as delivered by the reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    pub id: String,
    #[serde(default)]
    pub sections: Vec<Map<String, Value>>,
}

/// Discriminator values of the `type` field, grouped by target shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionType {
    Header,
    Table,
    Documents,
}

impl SectionType {
    /// Map a raw discriminator onto its target shape. `horizontalTable` is a table.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value {
            "header" => Some(SectionType::Header),
            "table" | "horizontalTable" => Some(SectionType::Table),
            "documents" => Some(SectionType::Documents),
            _ => None,
        }
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SectionType::Header => "header",
            SectionType::Table => "table",
            SectionType::Documents => "documents",
        })
    }
}

/// `{payload, type}` attached to headers, cells and documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Payload as plain text, if it is a string
    pub fn payload_str(&self) -> Option<&str> {
        self.payload.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderData {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub subtitle_text: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderSection {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub data: HeaderData,
    #[serde(default)]
    pub title: String,
}

/// Sign hint carried by amount cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
    #[serde(other)]
    Neutral,
}

/// The value side of a table row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub functional_style: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub trend: Option<Trend>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Detail {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn is_negative(&self) -> bool {
        self.trend == Some(Trend::Negative)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: Detail,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: Vec<TableRow>,
}

impl TableSection {
    /// First row matching the earliest title in `titles`.
    ///
    /// Priority follows `titles`, not row order. Comparison ignores case and
    /// surrounding whitespace.
    pub fn find(&self, titles: &[&str]) -> Option<&TableRow> {
        titles.iter().find_map(|wanted| {
            self.data
                .iter()
                .find(|row| title_matches(&row.title, wanted))
        })
    }
}

/// Title comparison ignoring surrounding whitespace and case (Unicode lowercase,
/// so `ÜBERSICHT` matches `Übersicht`).
pub fn title_matches(title: &str, wanted: &str) -> bool {
    title.trim().to_lowercase() == wanted.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    #[serde(default)]
    pub action: Option<Action>,
    /// Human date string, e.g. "24.11.2023"
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub postbox_type: Option<String>,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentsSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: Vec<DocumentEntry>,
}

/// A raw document re-materialized into addressable sections
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub id: String,
    pub header: HeaderSection,
    pub overview: Option<TableSection>,
    pub performance: Option<TableSection>,
    pub transaction: Option<TableSection>,
    pub documents: Option<DocumentsSection>,
}

impl NormalizedResponse {
    /// A response with only a header, used as the starting point of normalization
    pub fn with_header(id: impl Into<String>, header: HeaderSection) -> Self {
        Self {
            id: id.into(),
            header,
            overview: None,
            performance: None,
            transaction: None,
            documents: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trend_unknown_values_are_neutral() {
        let detail: Detail = serde_json::from_value(json!({"text": "1,00 €", "trend": "flat"})).unwrap();
        assert_eq!(detail.trend, Some(Trend::Neutral));
        assert!(!detail.is_negative());

        let detail: Detail = serde_json::from_value(json!({"text": "1,00 €", "trend": "negative"})).unwrap();
        assert!(detail.is_negative());
    }

    #[test]
    fn test_find_uses_title_priority_not_row_order() {
        let table: TableSection = serde_json::from_value(json!({
            "title": "Transaktion",
            "data": [
                {"title": "Anteile", "detail": {"text": "2"}},
                {"title": "Aktien", "detail": {"text": "40"}}
            ]
        }))
        .unwrap();

        let row = table.find(&["Aktien", "Anteile"]).unwrap();
        assert_eq!(row.detail.text(), "40");
        assert!(table.find(&["Shares"]).is_none());
    }

    #[test]
    fn test_find_ignores_case_and_whitespace() {
        let table: TableSection = serde_json::from_value(json!({
            "title": "Overview",
            "data": [{"title": " Order type ", "detail": {"text": "Buy"}}]
        }))
        .unwrap();
        assert!(table.find(&["Order Type"]).is_some());
    }

    #[test]
    fn test_title_matches_unicode_case() {
        assert!(title_matches(" ÜBERSICHT ", "Übersicht"));
        assert!(!title_matches("Ubersicht", "Übersicht"));
    }

    #[test]
    fn test_discriminators() {
        assert_eq!(SectionType::from_discriminator("horizontalTable"), Some(SectionType::Table));
        assert_eq!(SectionType::from_discriminator("steps"), None);
    }
}
