//! Canonical transaction record types handed to export/persistence

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;

/// Canonical transaction kinds the pipeline resolves to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Kind {
    #[serde(rename = "purchase")]
    Purchase,
    #[serde(rename = "sale")]
    Sale,
    #[serde(rename = "round-up")]
    RoundUp,
    #[serde(rename = "saveback")]
    Saveback,
    #[serde(rename = "dividend-payout")]
    DividendPayout,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "withdrawal")]
    Withdrawal,
    #[serde(rename = "interest-payout")]
    InterestPayout,
    #[serde(rename = "card-payment")]
    CardPayment,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Purchase,
        Kind::Sale,
        Kind::RoundUp,
        Kind::Saveback,
        Kind::DividendPayout,
        Kind::Deposit,
        Kind::Withdrawal,
        Kind::InterestPayout,
        Kind::CardPayment,
    ];

    /// Stable label used in CSV output and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Purchase => "purchase",
            Kind::Sale => "sale",
            Kind::RoundUp => "round-up",
            Kind::Saveback => "saveback",
            Kind::DividendPayout => "dividend-payout",
            Kind::Deposit => "deposit",
            Kind::Withdrawal => "withdrawal",
            Kind::InterestPayout => "interest-payout",
            Kind::CardPayment => "card-payment",
        }
    }

    /// True when money leaves the account
    pub fn is_outflow(&self) -> bool {
        matches!(
            self,
            Kind::Purchase
                | Kind::RoundUp
                | Kind::Saveback
                | Kind::Withdrawal
                | Kind::CardPayment
        )
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a PDF attached to a transaction. Nothing is downloaded here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentReference {
    /// Upstream document id
    pub id: String,
    /// Id of the transaction the document belongs to
    pub parent_id: String,
    pub url: String,
    /// Date as shown upstream (may be empty)
    pub date: String,
    pub title: String,
    /// Relative storage path: `{YYYY-MM}/{parent_id}/{title}.pdf`
    pub path: String,
}

/// One canonical transaction extracted from a timeline detail document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Source document id
    pub id: String,
    pub kind: Kind,
    /// Upstream status text, e.g. "executed"
    pub status: String,
    pub timestamp: DateTime<FixedOffset>,
    pub shares: f64,
    pub rate: f64,
    pub commission: f64,
    pub total: f64,
    pub tax_amount: f64,
    #[serde(rename = "yield")]
    pub yield_pct: f64,
    pub profit: f64,
    pub instrument: Instrument,
    pub documents: Vec<DocumentReference>,
}

impl TransactionRecord {
    /// Create a record with every numeric field at zero
    pub fn new(
        id: impl Into<String>,
        kind: Kind,
        status: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
        instrument: Instrument,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            status: status.into(),
            timestamp,
            shares: 0.0,
            rate: 0.0,
            commission: 0.0,
            total: 0.0,
            tax_amount: 0.0,
            yield_pct: 0.0,
            profit: 0.0,
            instrument,
            documents: Vec::new(),
        }
    }

    /// Storage paths of all attached documents, in upstream order
    pub fn document_paths(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.path.as_str()).collect()
    }

    /// Total with the direction of the money flow applied
    pub fn signed_total(&self) -> f64 {
        if self.kind.is_outflow() {
            -self.total.abs()
        } else {
            self.total.abs()
        }
    }
}
