//! Error types for the generation engine.

use std::path::PathBuf;
use thiserror::Error;

/// A data source file exists but could not be read or parsed.
///
/// A missing file is not an error; it loads as an empty pool.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read source '{name}' from {}: {source}", .path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV source '{name}' from {}: {source}", .path.display())]
    Csv {
        name: String,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Why an assembled URL candidate was dropped.
///
/// These never stop a run; the candidate is left out of the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateRejected {
    #[error("host alias '{0}' is not in the hosts table")]
    UnknownHost(String),

    #[error("empty {0}")]
    EmptyComponent(&'static str),

    #[error("malformed geo record: {0:?}")]
    MalformedGeoRecord(String),

    #[error("reserved URL character in segment {0:?}")]
    ReservedCharacter(String),

    #[error("category pool is empty")]
    NoCategories,
}
