//! timeline-ingest: turns raw timeline detail documents into `TransactionRecord`s.
//!
//! normalize -> resolve -> ModelBuilderFactory::create -> build

pub mod builders;
pub mod documents;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod reader;
pub mod resolver;
pub mod section;

pub use builders::{Builder, ModelBuilderFactory};
pub use documents::build_references;
pub use error::{BuildError, NormalizeError, PipelineError, ResolveError, Skip};
pub use normalize::{Normalization, normalize};
pub use pipeline::{BatchReport, Pipeline};
pub use reader::{Reader, TIMELINE_DETAIL, TimelineEntry};
pub use resolver::{Detector, TypeResolver};
pub use section::{NormalizedResponse, RawResponse};
