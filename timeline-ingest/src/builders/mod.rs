//! Model builders: one per transaction kind, picked by `ModelBuilderFactory`.
//!
//! Builders borrow the normalized response they read from and are built per
//! document. Shared extraction lives in `BaseBuilder`.

pub mod base;
pub mod cash;
pub mod purchase;

pub use base::BaseBuilder;
pub use cash::CashFlowBuilder;
pub use purchase::{DividendPayoutBuilder, PurchaseBuilder, SaleBuilder};

use timeline_core::{Kind, TransactionRecord};

use crate::error::BuildError;
use crate::section::NormalizedResponse;

/// The builder selected for one document
#[derive(Debug, Clone, Copy)]
pub enum Builder<'a> {
    Purchase(PurchaseBuilder<'a>),
    Sale(SaleBuilder<'a>),
    RoundUp(PurchaseBuilder<'a>),
    Saveback(PurchaseBuilder<'a>),
    DividendPayout(DividendPayoutBuilder<'a>),
    Deposit(CashFlowBuilder<'a>),
    Withdrawal(CashFlowBuilder<'a>),
    InterestPayout(CashFlowBuilder<'a>),
    CardPayment(CashFlowBuilder<'a>),
}

impl Builder<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Builder::Purchase(_) => Kind::Purchase,
            Builder::Sale(_) => Kind::Sale,
            Builder::RoundUp(_) => Kind::RoundUp,
            Builder::Saveback(_) => Kind::Saveback,
            Builder::DividendPayout(_) => Kind::DividendPayout,
            Builder::Deposit(_) => Kind::Deposit,
            Builder::Withdrawal(_) => Kind::Withdrawal,
            Builder::InterestPayout(_) => Kind::InterestPayout,
            Builder::CardPayment(_) => Kind::CardPayment,
        }
    }

    pub fn build(&self) -> Result<TransactionRecord, BuildError> {
        match self {
            Builder::Purchase(b) | Builder::RoundUp(b) | Builder::Saveback(b) => b.build(),
            Builder::Sale(b) => b.build(),
            Builder::DividendPayout(b) => b.build(),
            Builder::Deposit(b)
            | Builder::Withdrawal(b)
            | Builder::InterestPayout(b)
            | Builder::CardPayment(b) => b.build(),
        }
    }
}

/// Maps a resolved kind onto its builder
pub struct ModelBuilderFactory;

impl ModelBuilderFactory {
    pub fn create(kind: Kind, response: &NormalizedResponse) -> Builder<'_> {
        match kind {
            Kind::Purchase => Builder::Purchase(PurchaseBuilder::new(response)),
            Kind::Sale => Builder::Sale(SaleBuilder::new(response)),
            Kind::RoundUp => Builder::RoundUp(PurchaseBuilder::with_kind(response, Kind::RoundUp)),
            Kind::Saveback => Builder::Saveback(PurchaseBuilder::with_kind(response, Kind::Saveback)),
            Kind::DividendPayout => Builder::DividendPayout(DividendPayoutBuilder::new(response)),
            Kind::Deposit => Builder::Deposit(CashFlowBuilder::new(response, kind)),
            Kind::Withdrawal => Builder::Withdrawal(CashFlowBuilder::new(response, kind)),
            Kind::InterestPayout => Builder::InterestPayout(CashFlowBuilder::new(response, kind)),
            Kind::CardPayment => Builder::CardPayment(CashFlowBuilder::new(response, kind)),
        }
    }
}
