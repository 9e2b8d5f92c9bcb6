//! Type resolver: event-type tag + normalized sections -> canonical `Kind`.
//!
//! Detectors run in list order and the first match wins. Specific detectors
//! (keyed off the event-type tag) come before Sale/Purchase, which also read
//! the free-text order type and would otherwise claim documents that merely
//! carry an order-type-shaped cell.

use timeline_core::Kind;

use crate::error::ResolveError;
use crate::section::NormalizedResponse;

/// A detector predicate over (event-type tag, normalized response)
pub type Detector = fn(&str, &NormalizedResponse) -> bool;

pub const DEPOSIT_TAGS: &[&str] = &[
    "PAYMENT_INBOUND",
    "PAYMENT_INBOUND_SEPA_DIRECT_DEBIT",
    "PAYMENT_INBOUND_CREDIT_CARD",
    "PAYMENT_INBOUND_GOOGLE_PAY",
    "PAYMENT_INBOUND_APPLE_PAY",
    "INCOMING_TRANSFER",
    "INCOMING_TRANSFER_DELEGATION",
];
pub const WITHDRAWAL_TAGS: &[&str] = &[
    "PAYMENT_OUTBOUND",
    "OUTGOING_TRANSFER",
    "OUTGOING_TRANSFER_DELEGATION",
];
pub const DIVIDEND_TAGS: &[&str] = &["CREDIT", "SSP_CORPORATE_ACTION_INVOICE_CASH"];
pub const ROUND_UP_TAGS: &[&str] = &["BENEFITS_SPARE_CHANGE_EXECUTION"];
pub const SAVEBACK_TAGS: &[&str] = &["BENEFITS_SAVEBACK_EXECUTION"];
pub const INTEREST_TAGS: &[&str] = &["INTEREST_PAYOUT", "INTEREST_PAYOUT_CREATED"];
pub const CARD_TAGS: &[&str] = &["CARD_TRANSACTION", "CARD_SUCCESSFUL_TRANSACTION"];
pub const ORDER_TAGS: &[&str] = &["ORDER_EXECUTED", "TRADE_INVOICE", "TRADING_TRADE_EXECUTED"];
pub const SAVINGS_PLAN_TAGS: &[&str] = &[
    "SAVINGS_PLAN_EXECUTED",
    "SAVINGS_PLAN_INVOICE_CREATED",
    "TRADING_SAVINGSPLAN_EXECUTED",
];

/// Overview row titles that carry the order type ("Kauf", "Verkauf", ...)
pub const ORDER_TYPE_TITLES: &[&str] = &["Orderart", "Order Type", "Ordertyp", "Typ"];

const PURCHASE_KEYWORDS: &[&str] = &["kauf", "buy", "purchase", "sparplan", "savings"];
const SALE_KEYWORDS: &[&str] = &["verkauf", "sell", "sale"];

/// Ordered detector chain. Immutable once built; share it by reference.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    detectors: Vec<(Kind, Detector)>,
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new(vec![
            (Kind::Deposit, is_deposit as Detector),
            (Kind::Withdrawal, is_withdrawal as Detector),
            (Kind::DividendPayout, is_dividend_payout as Detector),
            (Kind::RoundUp, is_round_up as Detector),
            (Kind::Saveback, is_saveback as Detector),
            (Kind::InterestPayout, is_interest_payout as Detector),
            (Kind::CardPayment, is_card_payment as Detector),
            (Kind::Sale, is_sale as Detector),
            (Kind::Purchase, is_purchase as Detector),
        ])
    }
}

impl TypeResolver {
    pub fn new(detectors: Vec<(Kind, Detector)>) -> Self {
        Self { detectors }
    }

    /// Kinds in evaluation order
    pub fn order(&self) -> Vec<Kind> {
        self.detectors.iter().map(|(kind, _)| *kind).collect()
    }

    /// Resolve the first matching kind, or `UnsupportedType`.
    pub fn resolve(&self, event_type: &str, response: &NormalizedResponse) -> Result<Kind, ResolveError> {
        self.detectors
            .iter()
            .find(|(_, detect)| detect(event_type, response))
            .map(|(kind, _)| *kind)
            .ok_or_else(|| ResolveError::UnsupportedType {
                event_type: event_type.to_string(),
            })
    }
}

fn tag_in(event_type: &str, tags: &[&str]) -> bool {
    tags.iter().any(|t| t.eq_ignore_ascii_case(event_type.trim()))
}

/// Order type text from the Overview table, if any
pub fn order_type(response: &NormalizedResponse) -> Option<&str> {
    response
        .overview
        .as_ref()?
        .find(ORDER_TYPE_TITLES)
        .map(|row| row.detail.text())
}

/// Word-level keyword match, so "Verkauf" never matches "kauf".
fn has_keyword(text: &str, keywords: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .any(|w| keywords.contains(&w.as_str()))
}

pub fn is_deposit(event_type: &str, _: &NormalizedResponse) -> bool {
    tag_in(event_type, DEPOSIT_TAGS)
}

pub fn is_withdrawal(event_type: &str, _: &NormalizedResponse) -> bool {
    tag_in(event_type, WITHDRAWAL_TAGS)
}

pub fn is_dividend_payout(event_type: &str, _: &NormalizedResponse) -> bool {
    tag_in(event_type, DIVIDEND_TAGS)
}

pub fn is_round_up(event_type: &str, _: &NormalizedResponse) -> bool {
    tag_in(event_type, ROUND_UP_TAGS)
}

pub fn is_saveback(event_type: &str, _: &NormalizedResponse) -> bool {
    tag_in(event_type, SAVEBACK_TAGS)
}

pub fn is_interest_payout(event_type: &str, _: &NormalizedResponse) -> bool {
    tag_in(event_type, INTEREST_TAGS)
}

pub fn is_card_payment(event_type: &str, _: &NormalizedResponse) -> bool {
    tag_in(event_type, CARD_TAGS)
}

pub fn is_sale(event_type: &str, response: &NormalizedResponse) -> bool {
    tag_in(event_type, ORDER_TAGS)
        && order_type(response).is_some_and(|text| has_keyword(text, SALE_KEYWORDS))
}

pub fn is_purchase(event_type: &str, response: &NormalizedResponse) -> bool {
    if tag_in(event_type, SAVINGS_PLAN_TAGS) {
        return true;
    }
    tag_in(event_type, ORDER_TAGS)
        && order_type(response).is_some_and(|text| has_keyword(text, PURCHASE_KEYWORDS))
}
