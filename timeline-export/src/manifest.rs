//! Document manifest: every linked document across a batch, for a downloader
//! to fetch later. Columns: id,parent_id,url,date,title,path

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use timeline_core::{DocumentReference, TransactionRecord};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManifestRow<'a> {
    pub id: &'a str,
    pub parent_id: &'a str,
    pub url: &'a str,
    pub date: &'a str,
    pub title: &'a str,
    pub path: &'a str,
}

impl<'a> From<&'a DocumentReference> for ManifestRow<'a> {
    fn from(doc: &'a DocumentReference) -> Self {
        Self {
            id: &doc.id,
            parent_id: &doc.parent_id,
            url: &doc.url,
            date: &doc.date,
            title: &doc.title,
            path: &doc.path,
        }
    }
}

/// Write one row per document reference, in record order. Returns the row count.
pub fn write_manifest<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut count = 0;
    for doc in records.iter().flat_map(|r| r.documents.iter()) {
        wtr.serialize(ManifestRow::from(doc))
            .with_context(|| format!("writing document {} of {}", doc.id, doc.parent_id))?;
        count += 1;
    }
    wtr.flush()?;
    Ok(count)
}

pub fn write_manifest_file(path: impl AsRef<Path>, records: &[TransactionRecord]) -> Result<usize> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_manifest(file, records)
}
