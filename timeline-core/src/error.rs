use thiserror::Error;

/// Failure modes of the number/text parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No amount-shaped substring was found. Distinct from "parsed as zero".
    #[error("no amount pattern found in '{input}'")]
    NoMatch { input: String },

    /// More than one candidate amount was found where exactly one was expected.
    #[error("ambiguous amount in '{input}': {candidates:?}")]
    Ambiguous {
        input: String,
        candidates: Vec<String>,
    },

    #[error("invalid number '{input}': {reason}")]
    InvalidNumber { input: String, reason: String },
}

impl ParseError {
    pub(crate) fn no_match(input: &str) -> Self {
        ParseError::NoMatch {
            input: input.to_string(),
        }
    }
}
