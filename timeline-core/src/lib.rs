//! timeline-core: canonical transaction records, instrument classification,
//! and the locale-tolerant number/text parsers shared by the ingest pipeline.

pub mod error;
pub mod instrument;
pub mod parse;
pub mod record;

pub use error::ParseError;
pub use instrument::{Instrument, InstrumentType, classify};
pub use parse::{
    DecimalStyle, ExtractedAmount, extract_amount, extract_identifier, is_identifier,
    parse_amount, parse_comma_decimal, parse_period_decimal,
};
pub use record::{DocumentReference, Kind, TransactionRecord};
