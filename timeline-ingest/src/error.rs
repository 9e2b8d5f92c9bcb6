//! Error types per pipeline stage.
//!
//! Stage errors stay typed; `PipelineError::skip` is where a failure is
//! sorted into "why this document was skipped". Nothing here aborts a batch.

use thiserror::Error;
use timeline_core::ParseError;

use crate::section::SectionType;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("section {index} of document {id} contains no type")]
    SectionContainsNoType { id: String, index: usize },

    #[error("document {id} has no {section} section")]
    SectionTypeNotFound { id: String, section: SectionType },

    #[error("malformed {section} section in document {id}: {source}")]
    MalformedSection {
        id: String,
        section: SectionType,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Expected outcome for event kinds that are intentionally not modeled
    #[error("unsupported event type '{event_type}'")]
    UnsupportedType { event_type: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// A field required by the active builder could not be located or parsed
    #[error("insufficient data resolved for '{field}': {detail}")]
    InsufficientDataResolved { field: &'static str, detail: String },

    #[error("invalid header timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

impl BuildError {
    pub(crate) fn missing(field: &'static str, detail: impl Into<String>) -> Self {
        BuildError::InsufficientDataResolved {
            field,
            detail: detail.into(),
        }
    }

    pub(crate) fn unparsable(field: &'static str, err: ParseError) -> Self {
        BuildError::InsufficientDataResolved {
            field,
            detail: err.to_string(),
        }
    }
}

/// Why a document did not produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Skip {
    /// Reader failed or returned bytes that are not a detail document
    Unreadable,
    /// Missing type discriminator, missing header, or malformed section
    Structural,
    /// Event kind intentionally not modeled
    Unsupported,
    /// Classified, but a required field was not found
    InsufficientData,
}

impl Skip {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skip::Unreadable => "unreadable",
            Skip::Structural => "structural",
            Skip::Unsupported => "unsupported",
            Skip::InsufficientData => "insufficient-data",
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("reading document {id}: {source}")]
    Reader {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("decoding document {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl PipelineError {
    pub fn skip(&self) -> Skip {
        match self {
            PipelineError::Reader { .. } | PipelineError::Decode { .. } => Skip::Unreadable,
            PipelineError::Normalize(_) => Skip::Structural,
            PipelineError::Resolve(_) => Skip::Unsupported,
            PipelineError::Build(_) => Skip::InsufficientData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_categories() {
        let unsupported = PipelineError::from(ResolveError::UnsupportedType {
            event_type: "DOCUMENTS_ACCEPTED".to_string(),
        });
        assert_eq!(unsupported.skip(), Skip::Unsupported);

        let missing = PipelineError::from(BuildError::missing("shares", "no row"));
        assert_eq!(missing.skip(), Skip::InsufficientData);

        let structural = PipelineError::from(NormalizeError::SectionTypeNotFound {
            id: "tx".to_string(),
            section: SectionType::Header,
        });
        assert_eq!(structural.skip(), Skip::Structural);
        assert_eq!(structural.to_string(), "document tx has no header section");
    }
}
