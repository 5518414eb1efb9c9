//! Data sources.
//!
//! A source is either a flat file with one record per non-blank line, or a
//! CSV file with one record per row. Both load into [`csv::StringRecord`]s:
//! a line becomes a single-field record, a CSV row keeps its fields. Record
//! content is kept as-is, formatting happens in the assembler.

use crate::error::SourceError;
use corpus_config::{Config, SourceFormat, SourceSpec};
use csv::StringRecord;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Text of a record as used in a URL: the line itself for flat sources,
/// fields joined with `,` for CSV rows.
pub fn record_text(record: &StringRecord) -> Cow<'_, str> {
    match record.len() {
        1 => Cow::Borrowed(&record[0]),
        _ => Cow::Owned(record.iter().collect::<Vec<_>>().join(",")),
    }
}

/// A named pool of records, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSource {
    pub name: String,
    pub records: Vec<StringRecord>,
}

impl DataSource {
    pub fn new(name: impl Into<String>, records: Vec<StringRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// One single-field record per non-blank line.
    pub fn from_lines<S: AsRef<str>>(name: impl Into<String>, lines: &[S]) -> Self {
        let records = lines
            .iter()
            .map(|line| line.as_ref())
            .filter(|line| !line.trim().is_empty())
            .map(|line| StringRecord::from(vec![line]))
            .collect();
        Self::new(name, records)
    }

    /// One record per CSV row. Rows may have differing field counts.
    pub fn from_csv<R: Read>(
        name: impl Into<String>,
        reader: R,
        has_headers: bool,
    ) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(reader);

        let records = csv_reader
            .records()
            .filter(|row| {
                row.as_ref()
                    .map_or(true, |r| r.iter().any(|f| !f.trim().is_empty()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load one source from disk.
///
/// A file that does not exist yields an empty source and a warning. For
/// flat sources `skip_header` drops the first line; for CSV sources it
/// marks the first row as the header.
pub fn load_source(
    name: &str,
    path: &Path,
    format: SourceFormat,
    skip_header: bool,
) -> Result<DataSource, SourceError> {
    let io_error = |source: std::io::Error| SourceError::Io {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    };

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Source '{}' not found at {}; it will contribute no URLs",
                name,
                path.display()
            );
            return Ok(DataSource::new(name, Vec::new()));
        }
        Err(e) => return Err(io_error(e)),
    };

    let source = match format {
        SourceFormat::Lines => {
            let mut content = String::new();
            file.read_to_string(&mut content).map_err(&io_error)?;
            let lines: Vec<&str> = content.lines().skip(usize::from(skip_header)).collect();
            DataSource::from_lines(name, &lines)
        }
        SourceFormat::Csv => {
            DataSource::from_csv(name, file, skip_header).map_err(|source| SourceError::Csv {
                name: name.to_string(),
                path: path.to_path_buf(),
                source,
            })?
        }
    };

    debug!(
        "Loaded source '{}' from {} ({:?}, {} records)",
        name,
        path.display(),
        format,
        source.len()
    );

    Ok(source)
}

/// All sources of one run, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    sources: HashMap<String, DataSource>,
}

impl SourceSet {
    /// Load every source declared in the configuration.
    pub fn load(config: &Config) -> Result<Self, SourceError> {
        let mut set = SourceSet::default();
        for (name, spec) in &config.sources {
            set.insert(load_spec(config, name, spec)?);
        }
        Ok(set)
    }

    /// Add or replace a source.
    pub fn insert(&mut self, source: DataSource) {
        self.sources.insert(source.name.clone(), source);
    }

    /// Records of a source, or an empty slice for an unknown name.
    pub fn records(&self, name: &str) -> &[StringRecord] {
        match self.sources.get(name) {
            Some(source) => &source.records,
            None => {
                warn!("Source '{}' is not declared; it will contribute no URLs", name);
                &[]
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

fn load_spec(config: &Config, name: &str, spec: &SourceSpec) -> Result<DataSource, SourceError> {
    let path = config.source_path(spec);
    load_source(name, &path, spec.format(), spec.has_header())
}
