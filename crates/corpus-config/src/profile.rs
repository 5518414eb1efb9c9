//! Profile definitions as they appear in the configuration document.
//!
//! A profile is a named bundle of host, base path and source weighting. The
//! `policy` key selects how the weights are turned into URLs:
//!
//! - `generic_percentage` (default): `sourcePct` maps source names to weights,
//!   each sampled record becomes `host + basePath + record`.
//! - `geo_category`: the `geo` section assigns weights to the state, city,
//!   city-with-category and service-provider buckets.

use crate::weights::WeightTable;
use serde::{Deserialize, Serialize};

/// Which URL policy a profile uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    GenericPercentage,
    GeoCategory,
}

/// A profile entry.
///
/// `host` and `basePath` are optional here so that a missing value can be
/// reported by name during resolution instead of as a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileConfig {
    #[serde(default)]
    pub policy: PolicyKind,

    /// Host alias, looked up in the `hosts` table
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub base_path: Option<String>,

    /// Source weights for the generic percentage policy
    #[serde(default)]
    pub source_pct: WeightTable,

    /// Bucket configuration for the geo/category policy
    #[serde(default)]
    pub geo: Option<GeoConfig>,
}

fn default_base_country() -> String {
    "us".to_string()
}

fn default_pct_full_geo() -> f64 {
    0.5
}

/// A weighted bucket drawing from one source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeoBucket {
    pub source: String,
    pub pct: f64,
}

/// A weighted bucket of geo records, each suffixed with a random category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeoCategoryBucket {
    pub source: String,
    /// Source holding the category pool
    pub categories: String,
    pub pct: f64,
}

/// The `geo` section of a `geo_category` profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeoConfig {
    /// Emit `urlBase` and `urlBase/<baseCountry>` before the weighted buckets
    #[serde(default)]
    pub include_base_urls: bool,

    #[serde(default = "default_base_country")]
    pub base_country: String,

    /// Approximate share of city URLs that carry the full country/state/city path
    #[serde(default = "default_pct_full_geo")]
    pub pct_full_geo: f64,

    #[serde(default)]
    pub states: Option<GeoBucket>,

    #[serde(default)]
    pub cities: Option<GeoBucket>,

    #[serde(default)]
    pub geo_category: Option<GeoCategoryBucket>,

    #[serde(default)]
    pub service_providers: Option<GeoBucket>,
}

impl GeoConfig {
    /// Sum of the four bucket weights. Expected to be 1.
    pub fn weight_sum(&self) -> f64 {
        self.states.as_ref().map_or(0.0, |b| b.pct)
            + self.cities.as_ref().map_or(0.0, |b| b.pct)
            + self.geo_category.as_ref().map_or(0.0, |b| b.pct)
            + self.service_providers.as_ref().map_or(0.0, |b| b.pct)
    }
}
