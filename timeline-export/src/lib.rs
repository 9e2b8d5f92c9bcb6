//! timeline-export: CSV output for transaction records and their documents

pub mod manifest;
pub mod transactions;

pub use manifest::{ManifestRow, write_manifest, write_manifest_file};
pub use transactions::{TransactionRow, write_transactions, write_transactions_file};
