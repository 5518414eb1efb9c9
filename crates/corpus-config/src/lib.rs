//! Configuration for the url-corpus generator.
//!
//! A run is described by a single YAML document that names the data sources,
//! the host aliases and one or more profiles. The document is parsed into
//! typed structs and then resolved against the CLI arguments into a
//! [`ResolvedRun`], which is everything the generator needs.
//!
//! ```text
//! urls.yaml ──► Config ──resolve(profile, count)──► ResolvedRun
//!                                                    │
//!                                                    ├─ host / base_path / count
//!                                                    └─ Policy
//!                                                        ├─ GenericPercentage(WeightTable)
//!                                                        └─ GeoCategory(GeoPolicy)
//! ```
//!
//! # Example
//!
//! ```rust
//! use corpus_config::{Config, Policy};
//!
//! let config = Config::from_yaml(r#"
//! sources:
//!   cities: data/cities.txt
//! hosts:
//!   h: http://x
//! profiles:
//!   listings:
//!     host: h
//!     basePath: /list/
//!     sourcePct:
//!       cities: 1.0
//! "#).unwrap();
//!
//! let run = config.resolve(Some("listings"), Some(10)).unwrap();
//! assert_eq!(run.count, 10);
//! assert!(matches!(run.policy, Policy::GenericPercentage(_)));
//! ```

pub mod config;
pub mod error;
pub mod profile;
pub mod resolve;
pub mod weights;

pub use config::{Config, Defaults, SourceFormat, SourceSpec, DEFAULT_OUTPUT_PATH};
pub use error::ConfigError;
pub use profile::{GeoBucket, GeoCategoryBucket, GeoConfig, PolicyKind, ProfileConfig};
pub use resolve::{GeoPolicy, Policy, ResolvedRun};
pub use weights::WeightTable;
