//! Flat CSV rows, one per transaction record.
//!
//! Columns:
//! id,kind,status,timestamp,instrument_type,isin,name,shares,rate,commission,
//! total,tax_amount,yield,profit,documents

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use timeline_core::TransactionRecord;

/// A record with the instrument flattened and document paths joined by `;`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionRow<'a> {
    pub id: &'a str,
    pub kind: &'static str,
    pub status: &'a str,
    pub timestamp: String,
    pub instrument_type: &'static str,
    pub isin: &'a str,
    pub name: &'a str,
    pub shares: f64,
    pub rate: f64,
    pub commission: f64,
    pub total: f64,
    pub tax_amount: f64,
    #[serde(rename = "yield")]
    pub yield_pct: f64,
    pub profit: f64,
    pub documents: String,
}

impl<'a> From<&'a TransactionRecord> for TransactionRow<'a> {
    fn from(record: &'a TransactionRecord) -> Self {
        Self {
            id: &record.id,
            kind: record.kind.as_str(),
            status: &record.status,
            timestamp: record.timestamp.to_rfc3339(),
            instrument_type: record.instrument.kind.as_str(),
            isin: &record.instrument.isin,
            name: &record.instrument.name,
            shares: record.shares,
            rate: record.rate,
            commission: record.commission,
            total: record.total,
            tax_amount: record.tax_amount,
            yield_pct: record.yield_pct,
            profit: record.profit,
            documents: record.document_paths().join(";"),
        }
    }
}

/// Write records as CSV with a header row. Returns the number of rows written.
pub fn write_transactions<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(TransactionRow::from(record))
            .with_context(|| format!("writing transaction {}", record.id))?;
    }
    wtr.flush()?;
    Ok(records.len())
}

pub fn write_transactions_file(path: impl AsRef<Path>, records: &[TransactionRecord]) -> Result<usize> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_transactions(file, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use timeline_core::{DocumentReference, Instrument, Kind};

    #[test]
    fn test_row_flattens_instrument_and_documents() {
        let ts = DateTime::parse_from_rfc3339("2024-03-05T10:20:30+01:00").unwrap();
        let mut record = TransactionRecord::new(
            "tx-1",
            Kind::Purchase,
            "executed",
            ts,
            Instrument::new("IE00B4L5Y983", "Core MSCI World USD (Acc)", "logos/IE00B4L5Y983/v2"),
        );
        record.total = 395.8;
        for (id, title) in [("d-1", "Abrechnung"), ("d-2", "Kosteninformation")] {
            record.documents.push(DocumentReference {
                id: id.to_string(),
                parent_id: "tx-1".to_string(),
                url: format!("https://example.com/{id}"),
                date: "05.03.2024".to_string(),
                title: title.to_string(),
                path: format!("2024-03/tx-1/{title}.pdf"),
            });
        }

        let row = TransactionRow::from(&record);
        assert_eq!(row.kind, "purchase");
        assert_eq!(row.instrument_type, "etf");
        assert_eq!(row.timestamp, "2024-03-05T10:20:30+01:00");
        assert_eq!(row.documents, "2024-03/tx-1/Abrechnung.pdf;2024-03/tx-1/Kosteninformation.pdf");

        let mut out = Vec::new();
        assert_eq!(write_transactions(&mut out, &[record]).unwrap(), 1);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,kind,status,timestamp,instrument_type,isin,name,shares,rate,commission,total,tax_amount,yield,profit,documents"
        );
        assert!(lines.next().unwrap().starts_with("tx-1,purchase,executed,"));
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let mut out = Vec::new();
        assert_eq!(write_transactions(&mut out, &[]).unwrap(), 0);
        assert!(out.is_empty());
    }
}
