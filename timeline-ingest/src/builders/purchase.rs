//! Investment builders: purchases and everything shaped like one.

use timeline_core::{Kind, TransactionRecord};

use super::base::{BaseBuilder, titles};
use crate::error::BuildError;
use crate::section::NormalizedResponse;

/// Instrument, shares, rate, commission, total and documents.
///
/// Round-ups and saveback executions are purchases with their own kind.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseBuilder<'a> {
    base: BaseBuilder<'a>,
    kind: Kind,
    rate_titles: &'static [&'static str],
}

impl<'a> PurchaseBuilder<'a> {
    pub fn new(response: &'a NormalizedResponse) -> Self {
        Self::with_kind(response, Kind::Purchase)
    }

    pub fn with_kind(response: &'a NormalizedResponse, kind: Kind) -> Self {
        Self {
            base: BaseBuilder::new(response),
            kind,
            rate_titles: titles::RATE,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn build(&self) -> Result<TransactionRecord, BuildError> {
        let base = &self.base;
        let timestamp = base.timestamp()?;
        let instrument = base.instrument()?;

        let mut record = TransactionRecord::new(base.id(), self.kind, base.status(), timestamp, instrument);
        record.shares = base.shares()?;
        record.rate = base.rate_with(self.rate_titles)?;
        record.total = base.total()?;
        record.commission = base.commission();
        record.documents = base.documents(timestamp);
        Ok(record)
    }
}

/// Purchase fields plus yield, profit and tax from the Performance table
#[derive(Debug, Clone, Copy)]
pub struct SaleBuilder<'a> {
    inner: PurchaseBuilder<'a>,
}

impl<'a> SaleBuilder<'a> {
    pub fn new(response: &'a NormalizedResponse) -> Self {
        Self {
            inner: PurchaseBuilder::with_kind(response, Kind::Sale),
        }
    }

    pub fn build(&self) -> Result<TransactionRecord, BuildError> {
        let mut record = self.inner.build()?;
        let base = &self.inner.base;
        record.yield_pct = base.yield_pct();
        record.profit = base.profit();
        record.tax_amount = base.tax();
        Ok(record)
    }
}

/// Purchase fields with the per-share dividend as rate, plus withheld tax
#[derive(Debug, Clone, Copy)]
pub struct DividendPayoutBuilder<'a> {
    inner: PurchaseBuilder<'a>,
}

impl<'a> DividendPayoutBuilder<'a> {
    pub fn new(response: &'a NormalizedResponse) -> Self {
        let mut inner = PurchaseBuilder::with_kind(response, Kind::DividendPayout);
        inner.rate_titles = titles::DIVIDEND_RATE;
        Self { inner }
    }

    pub fn build(&self) -> Result<TransactionRecord, BuildError> {
        let mut record = self.inner.build()?;
        record.tax_amount = self.inner.base.tax();
        Ok(record)
    }
}
