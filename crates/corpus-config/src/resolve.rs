//! Turning the configuration document plus CLI arguments into a run.

use crate::config::Config;
use crate::error::ConfigError;
use crate::profile::{GeoConfig, PolicyKind};
use crate::weights::WeightTable;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Geo/category policy parameters.
pub type GeoPolicy = GeoConfig;

/// How the weighted buckets of a run are turned into URLs.
#[derive(Debug, Clone, PartialEq)]
pub enum Policy {
    /// `host + basePath + record` for each weighted source
    GenericPercentage(WeightTable),
    /// Hierarchical country/state/city URLs with optional category suffix
    GeoCategory(GeoPolicy),
}

/// A validated run: one profile, one count.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub profile_name: String,
    /// Host alias
    pub host: String,
    pub base_path: String,
    /// Total number of URLs requested
    pub count: usize,
    /// Host alias to base URL
    pub hosts: BTreeMap<String, String>,
    pub policy: Policy,
}

impl Config {
    /// Resolve the run for the given CLI arguments.
    ///
    /// CLI values take precedence over `defaults`. Every failure here is
    /// fatal and happens before any source is read.
    pub fn resolve(
        &self,
        profile: Option<&str>,
        count: Option<u64>,
    ) -> Result<ResolvedRun, ConfigError> {
        if self.profiles.is_empty() {
            return Err(ConfigError::profile("no profiles loaded"));
        }

        let profile_name = profile
            .or(self.defaults.profile.as_deref())
            .ok_or_else(|| {
                ConfigError::profile("no profile given and no default profile configured")
            })?;

        let profile = self
            .get_profile(profile_name)
            .ok_or_else(|| {
                ConfigError::profile(format!("profile '{profile_name}' not found"))
            })?;

        let host = profile
            .host
            .clone()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                ConfigError::profile(format!("profile '{profile_name}' has no host"))
            })?;

        let base_path = profile
            .base_path
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ConfigError::profile(format!("profile '{profile_name}' has no basePath"))
            })?;

        let count = count
            .or(self.defaults.count)
            .filter(|&c| c > 0)
            .ok_or(ConfigError::CountMissing)?;
        let count = usize::try_from(count).map_err(|_| ConfigError::CountMissing)?;

        let policy = match profile.policy {
            PolicyKind::GenericPercentage => {
                check_weights(profile_name, profile.source_pct.iter());
                if profile.source_pct.is_empty() {
                    warn!("Profile '{}' has no sourcePct entries", profile_name);
                }
                Policy::GenericPercentage(profile.source_pct.clone())
            }
            PolicyKind::GeoCategory => {
                let geo = profile.geo.clone().ok_or_else(|| {
                    ConfigError::profile(format!(
                        "profile '{profile_name}' uses geo_category but has no geo section"
                    ))
                })?;
                check_weights(
                    profile_name,
                    [
                        geo.states.as_ref().map(|b| (b.source.as_str(), b.pct)),
                        geo.cities.as_ref().map(|b| (b.source.as_str(), b.pct)),
                        geo.geo_category.as_ref().map(|b| (b.source.as_str(), b.pct)),
                        geo.service_providers.as_ref().map(|b| (b.source.as_str(), b.pct)),
                    ]
                    .into_iter()
                    .flatten(),
                );
                Policy::GeoCategory(geo)
            }
        };

        if !self.hosts.contains_key(&host) {
            warn!(
                "Host alias '{}' of profile '{}' is not in the hosts table; no URLs will be emitted",
                host, profile_name
            );
        }

        debug!(
            "Resolved profile '{}' ({:?}) with count {}",
            profile_name, profile.policy, count
        );

        Ok(ResolvedRun {
            profile_name: profile_name.to_string(),
            host,
            base_path,
            count,
            hosts: self.hosts.clone(),
            policy,
        })
    }
}

fn check_weights<'a>(profile: &str, weights: impl Iterator<Item = (&'a str, f64)>) {
    for (source, pct) in weights {
        if !(0.0..=1.0).contains(&pct) {
            warn!(
                "Profile '{}' weight for '{}' is {} (outside 0..=1)",
                profile, source, pct
            );
        }
    }
}
