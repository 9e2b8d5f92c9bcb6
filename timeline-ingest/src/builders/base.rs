//! Primitive field extractors shared by every builder.
//!
//! Each field is looked up by trying an ordered list of acceptable row titles
//! (locale and API-version variants) and parsing the first row found.

use chrono::{DateTime, FixedOffset};
use timeline_core::{
    DocumentReference, Instrument, ParseError, extract_amount, extract_identifier, is_identifier,
    parse_amount, parse_comma_decimal, parse_period_decimal,
};

use crate::documents::build_references;
use crate::error::BuildError;
use crate::section::{NormalizedResponse, TableRow, TableSection};

/// Acceptable row titles per field, in priority order
pub mod titles {
    pub const SHARES: &[&str] = &["Aktien", "Anteile", "Shares", "Stück"];
    pub const RATE: &[&str] = &["Aktienkurs", "Anteilspreis", "Kurs", "Share price", "Price per share"];
    pub const DIVIDEND_RATE: &[&str] = &[
        "Dividende pro Aktie",
        "Dividende pro Stück",
        "Ausschüttung pro Anteil",
        "Dividend per share",
    ];
    pub const COMMISSION: &[&str] = &["Gebühr", "Fee", "Fremdkostenzuschlag"];
    pub const TOTAL: &[&str] = &["Gesamt", "Total"];
    pub const TAX: &[&str] = &["Steuer", "Steuern", "Tax", "Taxes"];
    pub const YIELD: &[&str] = &["Rendite", "Yield"];
    pub const PROFIT: &[&str] = &["Gewinn", "Profit", "Gewinn/Verlust", "Gain"];
    pub const INSTRUMENT_NAME: &[&str] = &["Asset", "Anlage", "Wertpapier", "Security", "Instrument"];
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Read-only view over one normalized document
#[derive(Debug, Clone, Copy)]
pub struct BaseBuilder<'a> {
    response: &'a NormalizedResponse,
}

impl<'a> BaseBuilder<'a> {
    pub fn new(response: &'a NormalizedResponse) -> Self {
        Self { response }
    }

    pub fn response(&self) -> &'a NormalizedResponse {
        self.response
    }

    pub fn id(&self) -> &'a str {
        &self.response.id
    }

    /// Upstream status text; empty when the header carries none
    pub fn status(&self) -> String {
        self.response.header.data.status.clone()
    }

    pub fn timestamp(&self) -> Result<DateTime<FixedOffset>, BuildError> {
        let value = self.response.header.data.timestamp.trim();
        if value.is_empty() {
            return Err(BuildError::missing("timestamp", "header has no timestamp"));
        }

        DateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(value))
            .map_err(|e| BuildError::InvalidTimestamp {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Share count. Machine-formatted counts ("40", "0.5") parse first,
    /// German fractional counts ("1,535249") fall back to the comma parser.
    pub fn shares(&self) -> Result<f64, BuildError> {
        let row = self.required_row(self.response.transaction.as_ref(), "shares", titles::SHARES)?;
        let text = row.detail.text();
        parse_period_decimal(text)
            .or_else(|_| parse_comma_decimal(text, false))
            .map_err(|e| BuildError::unparsable("shares", e))
    }

    pub fn rate(&self) -> Result<f64, BuildError> {
        self.rate_with(titles::RATE)
    }

    pub fn rate_with(&self, candidates: &[&str]) -> Result<f64, BuildError> {
        self.required_amount(self.response.transaction.as_ref(), "rate", candidates)
    }

    /// Fee; 0.0 when absent or not a number ("Kostenlos")
    pub fn commission(&self) -> f64 {
        self.optional_amount(self.response.transaction.as_ref(), "commission", titles::COMMISSION)
    }

    pub fn total(&self) -> Result<f64, BuildError> {
        self.required_amount(self.response.transaction.as_ref(), "total", titles::TOTAL)
    }

    pub fn tax(&self) -> f64 {
        self.optional_amount(self.response.transaction.as_ref(), "tax", titles::TAX)
    }

    pub fn yield_pct(&self) -> f64 {
        self.optional_amount(self.response.performance.as_ref(), "yield", titles::YIELD)
    }

    pub fn profit(&self) -> f64 {
        self.optional_amount(self.response.performance.as_ref(), "profit", titles::PROFIT)
    }

    /// Total taken from the header sentence, e.g. "Du hast 500,00 € per Lastschrift hinzugefügt"
    pub fn total_from_title(&self) -> Result<f64, BuildError> {
        let title = &self.response.header.title;
        extract_amount(title)
            .and_then(|amount| amount.parse())
            .map_err(|e| BuildError::unparsable("total", e))
    }

    /// Instrument from the Overview name cell and the header's identifier.
    ///
    /// The identifier comes from the header action payload when that is
    /// identifier-shaped, otherwise it is recovered from the header icon path.
    pub fn instrument(&self) -> Result<Instrument, BuildError> {
        let name = self
            .required_row(self.response.overview.as_ref(), "instrument name", titles::INSTRUMENT_NAME)?
            .detail
            .text()
            .trim();
        if name.is_empty() {
            return Err(BuildError::missing("instrument name", "name cell is empty"));
        }

        let header = &self.response.header;
        let isin = header
            .action
            .as_ref()
            .and_then(|a| a.payload_str())
            .map(str::trim)
            .filter(|p| is_identifier(p))
            .map(str::to_string)
            .or_else(|| extract_identifier(&header.data.icon))
            .ok_or_else(|| BuildError::missing("instrument identifier", "no identifier in header action or icon"))?;

        Ok(Instrument::new(isin, name, header.data.icon.clone()))
    }

    /// References for the Documents section; empty when there is none
    pub fn documents(&self, timestamp: DateTime<FixedOffset>) -> Vec<DocumentReference> {
        self.response
            .documents
            .as_ref()
            .map(|docs| build_references(&self.response.id, timestamp, docs))
            .unwrap_or_default()
    }

    fn required_row(
        &self,
        table: Option<&'a TableSection>,
        field: &'static str,
        candidates: &[&str],
    ) -> Result<&'a TableRow, BuildError> {
        let table = table.ok_or_else(|| BuildError::missing(field, "section not present"))?;
        table
            .find(candidates)
            .ok_or_else(|| BuildError::missing(field, format!("none of {:?} in '{}'", candidates, table.title)))
    }

    fn required_amount(
        &self,
        table: Option<&'a TableSection>,
        field: &'static str,
        candidates: &[&str],
    ) -> Result<f64, BuildError> {
        let row = self.required_row(table, field, candidates)?;
        parse_cell(row).map_err(|e| BuildError::unparsable(field, e))
    }

    fn optional_amount(&self, table: Option<&'a TableSection>, field: &'static str, candidates: &[&str]) -> f64 {
        let Some(row) = table.and_then(|t| t.find(candidates)) else {
            return 0.0;
        };
        parse_cell(row).unwrap_or_else(|e| {
            log::debug!("document {}: {} defaulted to 0.0 ({})", self.response.id, field, e);
            0.0
        })
    }
}

/// Amount cell in either locale, with its sign taken from the trend flag
fn parse_cell(row: &TableRow) -> Result<f64, ParseError> {
    parse_amount(row.detail.text(), row.detail.is_negative())
}
