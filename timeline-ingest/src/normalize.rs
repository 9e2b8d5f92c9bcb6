//! Section normalizer: raw section blobs -> `NormalizedResponse`.
//!
//! Sections are grouped by their `type` discriminator, then each group is
//! re-decoded into its typed shape. Tables are further binned by title into
//! Overview / Performance / Transaction using the locale variants below.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::section::{
    DocumentsSection, HeaderSection, NormalizedResponse, RawResponse, SectionType, TableSection,
    title_matches,
};

pub const OVERVIEW_TITLES: &[&str] = &["Übersicht", "Overview"];
pub const PERFORMANCE_TITLES: &[&str] = &["Performance", "Rendite"];
pub const TRANSACTION_TITLES: &[&str] = &["Transaktion", "Transaction", "Geschäft", "Trade"];

/// Normalized document plus the optional section groups that were absent
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub response: NormalizedResponse,
    /// Table/documents groups with no entries. Recoverable, logged at warn.
    pub absent: Vec<SectionType>,
}

#[derive(Default)]
struct Groups<'a> {
    header: Vec<&'a Map<String, Value>>,
    table: Vec<&'a Map<String, Value>>,
    documents: Vec<&'a Map<String, Value>>,
}

/// Normalize a raw detail document.
///
/// Fails on a section without a string `type`, on a missing header, or when a
/// known section cannot be decoded into its shape.
pub fn normalize(raw: &RawResponse) -> Result<Normalization, NormalizeError> {
    let groups = group_sections(raw)?;

    let header_blob = groups
        .header
        .first()
        .ok_or_else(|| NormalizeError::SectionTypeNotFound {
            id: raw.id.clone(),
            section: SectionType::Header,
        })?;
    let header: HeaderSection = decode(&raw.id, SectionType::Header, header_blob)?;

    let mut response = NormalizedResponse::with_header(raw.id.clone(), header);
    let mut absent = Vec::new();

    if groups.table.is_empty() {
        log::warn!("document {}: no table sections", raw.id);
        absent.push(SectionType::Table);
    }
    for blob in &groups.table {
        let table: TableSection = decode(&raw.id, SectionType::Table, blob)?;
        bin_table(&mut response, table);
    }

    match groups.documents.first() {
        Some(blob) => {
            response.documents = Some(decode(&raw.id, SectionType::Documents, blob)?);
        }
        None => {
            log::warn!("document {}: no documents section", raw.id);
            absent.push(SectionType::Documents);
        }
    }

    Ok(Normalization { response, absent })
}

fn group_sections(raw: &RawResponse) -> Result<Groups<'_>, NormalizeError> {
    let mut groups = Groups::default();

    for (index, section) in raw.sections.iter().enumerate() {
        let discriminator = section
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| NormalizeError::SectionContainsNoType {
                id: raw.id.clone(),
                index,
            })?;

        match SectionType::from_discriminator(discriminator) {
            Some(SectionType::Header) => groups.header.push(section),
            Some(SectionType::Table) => groups.table.push(section),
            Some(SectionType::Documents) => groups.documents.push(section),
            None => log::debug!("document {}: ignoring section type '{}'", raw.id, discriminator),
        }
    }

    Ok(groups)
}

fn decode<T: DeserializeOwned>(
    id: &str,
    section: SectionType,
    blob: &Map<String, Value>,
) -> Result<T, NormalizeError> {
    serde_json::from_value(Value::Object(blob.clone())).map_err(|source| NormalizeError::MalformedSection {
        id: id.to_string(),
        section,
        source,
    })
}

fn bin_table(response: &mut NormalizedResponse, table: TableSection) {
    let slot = if OVERVIEW_TITLES.iter().any(|t| title_matches(&table.title, t)) {
        &mut response.overview
    } else if PERFORMANCE_TITLES.iter().any(|t| title_matches(&table.title, t)) {
        &mut response.performance
    } else if TRANSACTION_TITLES.iter().any(|t| title_matches(&table.title, t)) {
        &mut response.transaction
    } else {
        log::debug!("document {}: ignoring table '{}'", response.id, table.title);
        return;
    };

    if slot.is_none() {
        *slot = Some(table);
    } else {
        log::debug!("document {}: duplicate table '{}' ignored", response.id, table.title);
    }
}
