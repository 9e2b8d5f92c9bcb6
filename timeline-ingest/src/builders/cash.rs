//! Cash-flow builders. These documents carry their amount in the header
//! sentence rather than a table, and always settle against the cash account.

use timeline_core::{Instrument, Kind, TransactionRecord};

use super::base::BaseBuilder;
use crate::error::BuildError;
use crate::section::NormalizedResponse;

/// Deposits, withdrawals, interest payouts and card payments
#[derive(Debug, Clone, Copy)]
pub struct CashFlowBuilder<'a> {
    base: BaseBuilder<'a>,
    kind: Kind,
}

impl<'a> CashFlowBuilder<'a> {
    pub fn new(response: &'a NormalizedResponse, kind: Kind) -> Self {
        Self {
            base: BaseBuilder::new(response),
            kind,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn build(&self) -> Result<TransactionRecord, BuildError> {
        let base = &self.base;
        let timestamp = base.timestamp()?;

        let mut record = TransactionRecord::new(base.id(), self.kind, base.status(), timestamp, Instrument::cash());
        // Stored unsigned; direction follows from the kind.
        record.total = base.total_from_title()?.abs();
        if self.kind == Kind::InterestPayout {
            record.tax_amount = base.tax();
        }
        record.documents = base.documents(timestamp);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::HeaderSection;
    use serde_json::json;
    use timeline_core::InstrumentType;

    fn header_only(title: &str) -> NormalizedResponse {
        let mut header = HeaderSection::default();
        header.title = title.to_string();
        header.data.timestamp = "2024-03-05T10:20:30.123+0000".to_string();
        header.data.status = "executed".to_string();
        NormalizedResponse::with_header("tx-cash", header)
    }

    #[test]
    fn test_deposit_from_german_sentence() {
        let r = header_only("Du hast 500,00 € per Lastschrift hinzugefügt");
        let record = CashFlowBuilder::new(&r, Kind::Deposit).build().unwrap();
        assert_eq!(record.kind, Kind::Deposit);
        assert_eq!(record.total, 500.0);
        assert_eq!(record.instrument.kind, InstrumentType::Cash);
        assert_eq!(record.shares, 0.0);
    }

    #[test]
    fn test_withdrawal_from_english_sentence() {
        let r = header_only("You withdrew €1,250.75");
        let record = CashFlowBuilder::new(&r, Kind::Withdrawal).build().unwrap();
        assert_eq!(record.total, 1250.75);
        assert_eq!(record.signed_total(), -1250.75);
    }

    #[test]
    fn test_interest_payout_reads_tax() {
        let mut r = header_only("Du hast 3,12 € Zinsen erhalten");
        r.transaction = Some(
            serde_json::from_value(json!({
                "title": "Transaktion",
                "data": [{"title": "Steuern", "detail": {"text": "0,82 €"}}]
            }))
            .unwrap(),
        );
        let record = CashFlowBuilder::new(&r, Kind::InterestPayout).build().unwrap();
        assert_eq!(record.total, 3.12);
        assert_eq!(record.tax_amount, 0.82);
    }

    #[test]
    fn test_sentence_without_amount_is_insufficient_data() {
        let r = header_only("Karte gesperrt");
        let err = CashFlowBuilder::new(&r, Kind::CardPayment).build().unwrap_err();
        assert!(matches!(err, BuildError::InsufficientDataResolved { field: "total", .. }));
    }
}
