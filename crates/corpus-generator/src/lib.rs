//! Weighted-sampling URL generation engine.
//!
//! Given a [`ResolvedRun`](corpus_config::ResolvedRun) and the loaded data
//! sources, the [`UrlGenerator`] apportions the requested count across the
//! weighted sources, draws distinct records from each, and assembles them
//! into URL strings. The generator uses a seeded RNG so that the same seed,
//! configuration and source files give the same URL list.
//!
//! # Architecture
//!
//! ```text
//! SourceSet (lines / CSV)       ResolvedRun (profile, count, policy)
//!        │                                 │
//!        └──────────────┬──────────────────┘
//!                       ▼
//!              ┌─────────────────┐
//!              │  UrlGenerator   │
//!              │                 │
//!              │  sample_count   │──► how many per bucket
//!              │  sample         │──► distinct records
//!              │  assembler      │──► URL strings
//!              └────────┬────────┘
//!                       ▼
//!          GenerationResult { urls, buckets }
//! ```
//!
//! # Example
//!
//! ```rust
//! use corpus_config::Config;
//! use corpus_generator::{DataSource, SourceSet, UrlGenerator};
//!
//! let config = Config::from_yaml(r#"
//! hosts:
//!   h: http://x
//! profiles:
//!   listings:
//!     host: h
//!     basePath: /list/
//!     sourcePct:
//!       cities: 1.0
//! "#).unwrap();
//! let run = config.resolve(Some("listings"), Some(10)).unwrap();
//!
//! let mut sources = SourceSet::default();
//! sources.insert(DataSource::from_lines("cities", &["sf", "la", "ny"]));
//!
//! let result = UrlGenerator::new(&run, &sources, Some(42)).generate();
//! assert_eq!(result.urls.len(), 3);
//! ```

pub mod assembler;
pub mod error;
pub mod generator;
pub mod geo;
pub mod sampler;
pub mod source;

// Re-exports for convenience
pub use assembler::{build_simple_url, HostTable};
pub use error::{CandidateRejected, SourceError};
pub use generator::{BucketReport, GenerationResult, UrlGenerator};
pub use geo::GeoRecord;
pub use sampler::{sample, sample_count};
pub use source::{load_source, record_text, DataSource, SourceSet};
