//! # Review Ingest
//!
//! Loading and normalization of bibliographic review documents.
//!
//! ## Pipeline
//!
//! ```text
//! Document source (file / HTTP)
//!     │
//!     ├──> JSON parse ──(transport / parse failure)──> Fallback data
//!     │                                                   └─(unavailable)─> empty set
//!     │
//!     ├──> Shape classifier
//!     │      └─> Flat | Nested | Anomalous
//!     │
//!     ├──> Normalizer (batch-wide key casing)
//!     │      └─> Canonical records
//!     │
//!     └──> Topic extractor
//!            └─> Topics in first-seen order
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use review_ingest::{source_for, ReviewLoader};
//!
//! #[tokio::main]
//! async fn main() -> review_ingest::Result<()> {
//!     let loader = ReviewLoader::new(source_for("cochrane_reviews.json")?);
//!     let outcome = loader.load().await;
//!
//!     println!("{} reviews, {} topics", outcome.records.len(), outcome.topics.len());
//!     Ok(())
//! }
//! ```

mod error;
mod fallback;
mod inspect;
mod loader;
mod normalizer;
mod shape;
mod source;
mod stats;
mod topics;

pub use error::{FailureKind, IngestError, Result};
pub use fallback::{builtin_reviews, Fallback};
pub use inspect::{inspect_payload, PayloadReport};
pub use loader::{LoadOutcome, ReviewLoader};
pub use normalizer::{normalize, normalize_shape, AnomalyPolicy, FieldKeys};
pub use shape::{classify_ref, PayloadShape, ShapeKind};
pub use source::{source_for, DocumentSource, FileSource, HttpSource};
pub use stats::{LoadStats, RecordOrigin};
pub use topics::{extract_raw_topics, extract_topics};
