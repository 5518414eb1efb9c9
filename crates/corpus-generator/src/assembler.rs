//! URL assembly from sampled records.
//!
//! Two shapes are produced:
//!
//! - simple: `base_url + base_path + record`
//! - geo: `url_base/[country/state/]city[/category.htm]`, plus state pages
//!   and service-provider pages under the same `url_base`
//!
//! A candidate that cannot be assembled is rejected with a
//! [`CandidateRejected`] and never emitted.

use crate::error::CandidateRejected;
use crate::geo::{slug, GeoRecord};
use rand::Rng;
use std::collections::BTreeMap;

/// Host alias to base URL.
#[derive(Debug, Clone, Default)]
pub struct HostTable {
    hosts: BTreeMap<String, String>,
}

impl HostTable {
    pub fn new(hosts: BTreeMap<String, String>) -> Self {
        Self { hosts }
    }

    /// Base URL for an alias; empty entries count as unresolvable.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.hosts
            .get(alias)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }
}

/// `base_url + base_path + record`, with the host resolved through `hosts`.
pub fn build_simple_url(
    hosts: &HostTable,
    host: &str,
    base_path: &str,
    record: &str,
) -> Result<String, CandidateRejected> {
    if host.is_empty() {
        return Err(CandidateRejected::EmptyComponent("host"));
    }
    let base_url = hosts
        .resolve(host)
        .ok_or_else(|| CandidateRejected::UnknownHost(host.to_string()))?;
    if base_path.is_empty() {
        return Err(CandidateRejected::EmptyComponent("base path"));
    }
    if record.is_empty() {
        return Err(CandidateRejected::EmptyComponent("record"));
    }

    Ok(format!("{base_url}{base_path}{record}"))
}

/// Root of all geo URLs of one profile: the resolved host plus base path,
/// without a trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBase(String);

impl UrlBase {
    pub fn resolve(
        hosts: &HostTable,
        host: &str,
        base_path: &str,
    ) -> Result<Self, CandidateRejected> {
        let base_url = hosts
            .resolve(host)
            .ok_or_else(|| CandidateRejected::UnknownHost(host.to_string()))?;
        let joined = format!("{base_url}{base_path}");
        Ok(UrlBase(joined.trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `url_base/segment`
    pub fn child(&self, segment: &str) -> Result<String, CandidateRejected> {
        Ok(format!("{}/{}", self.0, slug(segment)?))
    }

    /// `url_base/country/state`
    pub fn state_page(&self, record: &GeoRecord) -> Result<String, CandidateRejected> {
        Ok(format!(
            "{}/{}/{}",
            self.0,
            slug(&record.country)?,
            slug(&record.state)?
        ))
    }

    /// `url_base/city`, or `url_base/country/state/city` when `full_geo` is set.
    pub fn city_page(
        &self,
        record: &GeoRecord,
        full_geo: bool,
    ) -> Result<String, CandidateRejected> {
        let city = record
            .city
            .as_deref()
            .ok_or(CandidateRejected::EmptyComponent("city"))?;
        if full_geo {
            Ok(format!(
                "{}/{}/{}/{}",
                self.0,
                slug(&record.country)?,
                slug(&record.state)?,
                slug(city)?
            ))
        } else {
            Ok(format!("{}/{}", self.0, slug(city)?))
        }
    }
}

/// Append `/<category>.htm` to a geo URL.
pub fn with_category(url: &str, category: &str) -> Result<String, CandidateRejected> {
    if category.trim().is_empty() {
        return Err(CandidateRejected::EmptyComponent("category"));
    }
    Ok(format!("{url}/{}.htm", slug(category)?))
}

/// Decide whether one city URL uses the full country/state/city form.
///
/// Draws uniformly from `[1, round(1 / pct_full_geo)]` and succeeds on 1, so
/// the long-run share is `1 / round(1 / pct)`, not `pct` itself (0.3 gives 1/3).
pub fn choose_full_geo<R: Rng + ?Sized>(rng: &mut R, pct_full_geo: f64) -> bool {
    if pct_full_geo.is_nan() || pct_full_geo <= 0.0 {
        return false;
    }
    let upper = (1.0 / pct_full_geo).round().max(1.0) as u64;
    rng.gen_range(1..=upper) == 1
}
