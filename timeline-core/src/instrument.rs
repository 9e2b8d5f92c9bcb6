//! Instrument value type and the deterministic asset-category classifier.
//!
//! Classification is naming-convention based. Rule order matters because the
//! checks overlap (an ETF name can carry an identifier with any prefix):
//! 1) cash: empty name, or identifier carrying the cash-account marker
//! 2) ETF: name ends in a distributing/accumulating marker
//! 3) crypto: synthetic `XF000` identifier
//! 4) lending: `XS` bond identifier
//! 5) stocks: any other ISIN-shaped identifier
//! 6) everything else

use serde::{Deserialize, Serialize};

use crate::parse::is_identifier;

/// Prefix the upstream uses for the settlement (cash) account identifier
pub const CASH_ACCOUNT_MARKER: &str = "CASH_";
/// Synthetic identifier prefix for crypto assets (e.g. `XF000BTC0017`)
pub const CRYPTO_PREFIX: &str = "XF000";
/// Eurobond prefix used for lending/bond products
pub const LENDING_PREFIX: &str = "XS";

const FUND_SUFFIXES: [&str; 6] = [
    "(dist)",
    "(acc)",
    "(ausschüttend)",
    "(thesaurierend)",
    " dist",
    " acc",
];

/// Asset category of an instrument
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InstrumentType {
    #[serde(rename = "stocks")]
    Stocks,
    #[serde(rename = "etf")]
    Etf,
    #[serde(rename = "cryptocurrency")]
    Cryptocurrency,
    #[serde(rename = "lending")]
    Lending,
    #[serde(rename = "cash")]
    Cash,
    #[serde(rename = "other")]
    Other,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Stocks => "stocks",
            InstrumentType::Etf => "etf",
            InstrumentType::Cryptocurrency => "cryptocurrency",
            InstrumentType::Lending => "lending",
            InstrumentType::Cash => "cash",
            InstrumentType::Other => "other",
        }
    }
}

/// A traded (or cash) instrument attached to a transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instrument {
    /// ISIN-like identifier; empty for cash
    pub isin: String,
    pub name: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: InstrumentType,
}

impl Instrument {
    /// Build an instrument, deriving its type from name and identifier
    pub fn new(isin: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        let isin = isin.into();
        let name = name.into();
        let kind = classify(&name, &isin);
        Self {
            isin,
            name,
            icon: icon.into(),
            kind,
        }
    }

    /// The settlement account, used by deposits, withdrawals and payouts
    pub fn cash() -> Self {
        Self::new("", "", "")
    }
}

/// Classify an instrument by its name and identifier.
pub fn classify(name: &str, identifier: &str) -> InstrumentType {
    let name = name.trim();
    let identifier = identifier.trim();

    if name.is_empty() || identifier.starts_with(CASH_ACCOUNT_MARKER) {
        return InstrumentType::Cash;
    }

    let lower = name.to_lowercase();
    if FUND_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
        return InstrumentType::Etf;
    }

    if identifier.starts_with(CRYPTO_PREFIX) {
        return InstrumentType::Cryptocurrency;
    }

    if identifier.starts_with(LENDING_PREFIX) {
        return InstrumentType::Lending;
    }

    if is_identifier(identifier) {
        return InstrumentType::Stocks;
    }

    InstrumentType::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_is_cash() {
        assert_eq!(classify("", "US0378331005"), InstrumentType::Cash);
        assert_eq!(classify("   ", ""), InstrumentType::Cash);
    }

    #[test]
    fn test_cash_marker_beats_fund_suffix() {
        assert_eq!(classify("Cash (Acc)", "CASH_DE0001"), InstrumentType::Cash);
    }

    #[test]
    fn test_fund_suffix_is_etf() {
        assert_eq!(classify("MSCI World USD (Dist)", "IE00B4L5Y983"), InstrumentType::Etf);
        assert_eq!(classify("Core S&P 500 USD (Acc)", "IE00B5BMR087"), InstrumentType::Etf);
        assert_eq!(classify("FTSE All-World Dist", "IE00B3RBWM25"), InstrumentType::Etf);
    }

    #[test]
    fn test_fund_suffix_wins_over_identifier_prefix() {
        // An XS identifier alone would classify as lending.
        assert_eq!(classify("MSCI World USD (Dist)", "XS1234567890"), InstrumentType::Etf);
        assert_eq!(classify("Bitcoin Tracker (Acc)", "XF000BTC0017"), InstrumentType::Etf);
    }

    #[test]
    fn test_crypto_and_lending_prefixes() {
        assert_eq!(classify("Bitcoin", "XF000BTC0017"), InstrumentType::Cryptocurrency);
        assert_eq!(classify("Bond 2027", "XS2583211201"), InstrumentType::Lending);
    }

    #[test]
    fn test_isin_falls_back_to_stocks_else_other() {
        assert_eq!(classify("Apple", "US0378331005"), InstrumentType::Stocks);
        assert_eq!(classify("Mystery", "n/a"), InstrumentType::Other);
        assert_eq!(classify("Mystery", ""), InstrumentType::Other);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let inputs = [
            ("MSCI World USD (Dist)", "IE00B4L5Y983"),
            ("Bitcoin", "XF000BTC0017"),
            ("", ""),
            ("Apple", "US0378331005"),
        ];
        for (name, isin) in inputs {
            assert_eq!(classify(name, isin), classify(name, isin));
        }
    }

    #[test]
    fn test_instrument_new_classifies() {
        let etf = Instrument::new("IE00B4L5Y983", "MSCI World USD (Dist)", "logos/IE00B4L5Y983/v2");
        assert_eq!(etf.kind, InstrumentType::Etf);
        assert_eq!(Instrument::cash().kind, InstrumentType::Cash);
    }
}
