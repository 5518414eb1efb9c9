//! The configuration document.

use crate::error::ConfigError;
use crate::profile::ProfileConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Output file used when neither the document nor the CLI names one.
pub const DEFAULT_OUTPUT_PATH: &str = "./urls.txt";

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

/// Fallbacks for the positional CLI arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Profile used when none is given on the command line
    #[serde(default)]
    pub profile: Option<String>,

    /// URL count used when none is given on the command line
    #[serde(default)]
    pub count: Option<u64>,
}

/// How a source file is split into records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// One record per line
    Lines,
    /// One record per CSV row
    Csv,
}

/// Where a data source lives.
///
/// Accepts either a bare path or a map with `header` and `format` keys:
///
/// ```yaml
/// sources:
///   cities: data/cities.txt
///   geo_cities: { path: data/geo_cities.csv, header: true }
///   geo_states: { path: data/states.dat, format: csv }
/// ```
///
/// Without an explicit `format`, files ending in `.csv` are read as CSV and
/// everything else line by line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SourceSpec {
    Path(PathBuf),
    Detailed {
        path: PathBuf,
        /// Skip the first line (or CSV header row) of the file
        #[serde(default)]
        header: bool,
        #[serde(default)]
        format: Option<SourceFormat>,
    },
}

impl SourceSpec {
    pub fn path(&self) -> &Path {
        match self {
            SourceSpec::Path(path) | SourceSpec::Detailed { path, .. } => path,
        }
    }

    pub fn has_header(&self) -> bool {
        matches!(self, SourceSpec::Detailed { header: true, .. })
    }

    pub fn format(&self) -> SourceFormat {
        if let SourceSpec::Detailed {
            format: Some(format),
            ..
        } = self
        {
            return *format;
        }
        let is_csv = self
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            SourceFormat::Csv
        } else {
            SourceFormat::Lines
        }
    }
}

/// Full configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output file path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Seed for the random source; entropy is used when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Fallbacks for the profile name and count
    #[serde(default)]
    pub defaults: Defaults,

    /// Source name to backing file
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSpec>,

    /// Host alias to base URL
    #[serde(default)]
    pub hosts: BTreeMap<String, String>,

    /// Named profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,

    /// Directory that relative source paths resolve against (not serialized)
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from a YAML file.
    ///
    /// Relative source paths in the document are resolved against the
    /// directory containing `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::ConfigurationMissing(path.to_path_buf()));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        tracing::debug!(
            "Loaded configuration from {} ({} sources, {} hosts, {} profiles)",
            path.display(),
            config.sources.len(),
            config.hosts.len(),
            config.profiles.len()
        );
        Ok(config)
    }

    /// Parse the configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Set the directory relative source paths resolve against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Resolve a source path against the configuration's directory.
    pub fn source_path(&self, spec: &SourceSpec) -> PathBuf {
        let path = spec.path();
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Get a profile by name.
    pub fn get_profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }
}
