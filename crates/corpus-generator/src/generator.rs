//! Generation orchestrator.

use crate::assembler::{build_simple_url, choose_full_geo, with_category, HostTable, UrlBase};
use crate::error::CandidateRejected;
use crate::geo::GeoRecord;
use crate::sampler::{sample, sample_count};
use crate::source::{record_text, SourceSet};
use corpus_config::{GeoPolicy, Policy, ResolvedRun, WeightTable};
use csv::StringRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Tolerance for the advisory check that geo bucket weights sum to 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// How far a geo weight sum is from 1, or `None` when within tolerance.
fn weight_sum_divergence(sum: f64) -> Option<f64> {
    let divergence = sum - 1.0;
    (divergence.is_nan() || divergence.abs() > WEIGHT_SUM_TOLERANCE).then_some(divergence)
}

/// Outcome of one weighted bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketReport {
    /// Bucket label (source name, or geo bucket name)
    pub bucket: String,
    pub source: String,
    pub pct: f64,
    /// Size of the source pool
    pub pool_size: usize,
    /// Records drawn
    pub drawn: usize,
    /// URLs emitted after rejections
    pub emitted: usize,
}

impl BucketReport {
    pub fn rejected(&self) -> usize {
        self.drawn - self.emitted
    }
}

/// The URLs of one run, in generation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResult {
    pub urls: Vec<String>,
    pub buckets: Vec<BucketReport>,
}

impl GenerationResult {
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    fn push(&mut self, candidate: Result<String, CandidateRejected>) -> bool {
        match candidate {
            Ok(url) => {
                self.urls.push(url);
                true
            }
            Err(reason) => {
                debug!("Dropped URL candidate: {}", reason);
                false
            }
        }
    }
}

/// URL generator for one resolved run.
///
/// The generator uses a seeded random number generator so that the same
/// seed, run and sources produce the same URL list.
pub struct UrlGenerator<'a> {
    run: &'a ResolvedRun,
    sources: &'a SourceSet,
    hosts: HostTable,
    rng: StdRng,
}

impl<'a> UrlGenerator<'a> {
    /// Create a generator. Without a seed the RNG is seeded from OS entropy.
    pub fn new(run: &'a ResolvedRun, sources: &'a SourceSet, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            run,
            sources,
            hosts: HostTable::new(run.hosts.clone()),
            rng,
        }
    }

    /// Build the complete URL list.
    pub fn generate(mut self) -> GenerationResult {
        info!(
            "Generating {} URLs for profile '{}'",
            self.run.count, self.run.profile_name
        );

        let run = self.run;
        let result = match &run.policy {
            Policy::GenericPercentage(weights) => self.generate_generic(weights),
            Policy::GeoCategory(geo) => self.generate_geo(geo),
        };

        for bucket in &result.buckets {
            debug!(
                "Bucket '{}' (source '{}', pct {}): pool {}, drawn {}, emitted {}",
                bucket.bucket,
                bucket.source,
                bucket.pct,
                bucket.pool_size,
                bucket.drawn,
                bucket.emitted
            );
        }
        info!("Generated {} URLs", result.len());
        result
    }

    fn generate_generic(&mut self, weights: &WeightTable) -> GenerationResult {
        let mut result = GenerationResult::default();
        let total = self.run.count;
        debug!(
            "Source weights of profile '{}' sum to {}",
            self.run.profile_name,
            weights.total()
        );

        for (source, pct) in weights.iter() {
            let pool = self.sources.records(source);
            let n = sample_count(total, pct, pool.len());
            let drawn = sample(&mut self.rng, pool, n);

            let mut emitted = 0;
            for record in &drawn {
                let candidate = build_simple_url(
                    &self.hosts,
                    &self.run.host,
                    &self.run.base_path,
                    &record_text(record),
                );
                if result.push(candidate) {
                    emitted += 1;
                }
            }

            result.buckets.push(BucketReport {
                bucket: source.to_string(),
                source: source.to_string(),
                pct,
                pool_size: pool.len(),
                drawn: drawn.len(),
                emitted,
            });
        }

        result
    }

    fn generate_geo(&mut self, geo: &GeoPolicy) -> GenerationResult {
        let mut result = GenerationResult::default();

        let url_base = match UrlBase::resolve(&self.hosts, &self.run.host, &self.run.base_path) {
            Ok(base) => base,
            Err(reason) => {
                warn!("No geo URLs can be built: {}", reason);
                return result;
            }
        };

        // Base URLs are always emitted, even when they exceed the count.
        let mut remaining = self.run.count;
        if geo.include_base_urls {
            result.push(Ok(url_base.as_str().to_string()));
            result.push(url_base.child(&geo.base_country));
            remaining = remaining.saturating_sub(2);
        }

        let weight_sum = geo.weight_sum();
        match weight_sum_divergence(weight_sum) {
            Some(divergence) => warn!(
                "Geo bucket weights of profile '{}' sum to {} ({:+} from 1)",
                self.run.profile_name, weight_sum, divergence
            ),
            None => debug!("Geo bucket weights sum to {}", weight_sum),
        }

        let sources = self.sources;
        let pct_full_geo = geo.pct_full_geo;

        if let Some(bucket) = &geo.states {
            let report = self.geo_bucket(
                "states",
                &bucket.source,
                bucket.pct,
                remaining,
                &mut result,
                |_, record| url_base.state_page(&GeoRecord::try_from(record)?),
            );
            result.buckets.push(report);
        }

        if let Some(bucket) = &geo.cities {
            let report = self.geo_bucket(
                "cities",
                &bucket.source,
                bucket.pct,
                remaining,
                &mut result,
                |rng, record| {
                    let record = GeoRecord::try_from(record)?;
                    url_base.city_page(&record, choose_full_geo(rng, pct_full_geo))
                },
            );
            result.buckets.push(report);
        }

        if let Some(bucket) = &geo.geo_category {
            let categories = sources.records(&bucket.categories);
            let report = self.geo_bucket(
                "geoCategory",
                &bucket.source,
                bucket.pct,
                remaining,
                &mut result,
                |rng, record| {
                    let record = GeoRecord::try_from(record)?;
                    let url = url_base.city_page(&record, choose_full_geo(rng, pct_full_geo))?;
                    let category = categories
                        .choose(rng)
                        .ok_or(CandidateRejected::NoCategories)?;
                    with_category(&url, &record_text(category))
                },
            );
            result.buckets.push(report);
        }

        if let Some(bucket) = &geo.service_providers {
            let report = self.geo_bucket(
                "serviceProviders",
                &bucket.source,
                bucket.pct,
                remaining,
                &mut result,
                |_, record| url_base.child(&record_text(record)),
            );
            result.buckets.push(report);
        }

        result
    }

    /// Sample one geo bucket against the remaining budget and assemble each record.
    fn geo_bucket<F>(
        &mut self,
        label: &str,
        source: &str,
        pct: f64,
        budget: usize,
        result: &mut GenerationResult,
        mut assemble: F,
    ) -> BucketReport
    where
        F: FnMut(&mut StdRng, &StringRecord) -> Result<String, CandidateRejected>,
    {
        let pool = self.sources.records(source);
        let n = sample_count(budget, pct, pool.len());
        let drawn = sample(&mut self.rng, pool, n);

        let mut emitted = 0;
        for record in &drawn {
            if result.push(assemble(&mut self.rng, record)) {
                emitted += 1;
            }
        }

        BucketReport {
            bucket: label.to_string(),
            source: source.to_string(),
            pct,
            pool_size: pool.len(),
            drawn: drawn.len(),
            emitted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSource;
    use corpus_config::{GeoBucket, GeoCategoryBucket, GeoConfig};
    use std::collections::{BTreeMap, HashSet};

    fn run(host: &str, base_path: &str, count: usize, policy: Policy) -> ResolvedRun {
        ResolvedRun {
            profile_name: "test".to_string(),
            host: host.to_string(),
            base_path: base_path.to_string(),
            count,
            hosts: BTreeMap::from([("h".to_string(), "http://x".to_string())]),
            policy,
        }
    }

    fn source(name: &str, records: &[&str]) -> DataSource {
        DataSource::from_lines(name, records)
    }

    fn csv_source(name: &str, rows: &str) -> DataSource {
        DataSource::from_csv(name, rows.as_bytes(), false).unwrap()
    }

    fn cities() -> SourceSet {
        let mut sources = SourceSet::default();
        sources.insert(source("cities", &["sf", "la", "ny"]));
        sources
    }

    #[test]
    fn test_generic_single_source() {
        let sources = cities();
        let run = run(
            "h",
            "/list",
            10,
            Policy::GenericPercentage(WeightTable::new([("cities", 1.0)])),
        );

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert_eq!(result.len(), 3);
        let unique: HashSet<&String> = result.urls.iter().collect();
        assert_eq!(unique.len(), 3);
        for url in &result.urls {
            let city = url.strip_prefix("http://x/list").unwrap();
            assert!(["sf", "la", "ny"].contains(&city), "unexpected url {url}");
        }
        assert_eq!(result.buckets.len(), 1);
        assert_eq!(result.buckets[0].drawn, 3);
        assert_eq!(result.buckets[0].rejected(), 0);
    }

    #[test]
    fn test_generic_declared_order_and_counts() {
        let mut sources = SourceSet::default();
        sources.insert(source("b", &["b1", "b2", "b3", "b4", "b5"]));
        sources.insert(source("a", &["a1", "a2", "a3", "a4", "a5"]));
        let run = run(
            "h",
            "/",
            10,
            Policy::GenericPercentage(WeightTable::new([("b", 0.2), ("a", 0.3)])),
        );

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        // ceil(10 * 0.2) = 2, then ceil(10 * 0.3) = 3
        assert_eq!(result.len(), 5);
        assert!(result.urls[..2].iter().all(|u| u.starts_with("http://x/b")));
        assert!(result.urls[2..].iter().all(|u| u.starts_with("http://x/a")));
    }

    #[test]
    fn test_generic_missing_source_contributes_nothing() {
        let sources = cities();
        let run = run(
            "h",
            "/list/",
            10,
            Policy::GenericPercentage(WeightTable::new([("ghost", 0.5), ("cities", 0.2)])),
        );

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert_eq!(result.buckets[0].drawn, 0);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_generic_unknown_host_drops_everything() {
        let sources = cities();
        let run = run(
            "ghost",
            "/list/",
            10,
            Policy::GenericPercentage(WeightTable::new([("cities", 1.0)])),
        );

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert!(result.is_empty());
        assert_eq!(result.buckets[0].drawn, 3);
        assert_eq!(result.buckets[0].rejected(), 3);
    }

    #[test]
    fn test_same_seed_same_urls() {
        let mut sources = SourceSet::default();
        let lines: Vec<String> = (0..100).map(|i| format!("c{i}")).collect();
        sources.insert(DataSource::from_lines("cities", &lines));
        let run = run(
            "h",
            "/list/",
            20,
            Policy::GenericPercentage(WeightTable::new([("cities", 0.5)])),
        );

        let first = UrlGenerator::new(&run, &sources, Some(7)).generate();
        let second = UrlGenerator::new(&run, &sources, Some(7)).generate();
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }

    fn geo_sources() -> SourceSet {
        let mut sources = SourceSet::default();
        sources.insert(csv_source("geo_states", "us,ca\nus,ny\nus,tx\nus,wa\n"));
        sources.insert(csv_source(
            "geo_cities",
            "us,ca,San Francisco\n\
             us,ca,la\n\
             us,ny,nyc\n\
             us,tx,austin\n\
             us,wa,seattle\n\
             us,wa,tacoma\n",
        ));
        sources.insert(source("categories", &["plumbers", "Roof Repair"]));
        sources.insert(source("providers", &["acme", "bolt", "crane"]));
        sources
    }

    fn geo_policy(include_base_urls: bool, pct_full_geo: f64) -> GeoConfig {
        GeoConfig {
            include_base_urls,
            base_country: "us".to_string(),
            pct_full_geo,
            states: Some(GeoBucket {
                source: "geo_states".to_string(),
                pct: 0.2,
            }),
            cities: Some(GeoBucket {
                source: "geo_cities".to_string(),
                pct: 0.3,
            }),
            geo_category: Some(GeoCategoryBucket {
                source: "geo_cities".to_string(),
                categories: "categories".to_string(),
                pct: 0.3,
            }),
            service_providers: Some(GeoBucket {
                source: "providers".to_string(),
                pct: 0.2,
            }),
        }
    }

    #[test]
    fn test_geo_buckets_size_against_remaining_budget() {
        let sources = geo_sources();
        let run = run("h", "/dir", 12, Policy::GeoCategory(geo_policy(true, 1.0)));

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert_eq!(result.urls[0], "http://x/dir");
        assert_eq!(result.urls[1], "http://x/dir/us");

        // 10 remaining: states 2, cities 3, geoCategory 3, providers 2
        let drawn: Vec<usize> = result.buckets.iter().map(|b| b.drawn).collect();
        assert_eq!(drawn, vec![2, 3, 3, 2]);
        assert_eq!(result.len(), 12);

        let states = &result.urls[2..4];
        assert!(states
            .iter()
            .all(|u| u.starts_with("http://x/dir/us/") && u.matches('/').count() == 5));

        // pct_full_geo = 1.0 always selects the full form
        let cities = &result.urls[4..7];
        assert!(cities.iter().all(|u| u.matches('/').count() == 6));
        assert!(cities.iter().all(|u| !u.contains(' ')));

        let categorized = &result.urls[7..10];
        assert!(categorized.iter().all(|u| u.ends_with("/plumbers.htm")
            || u.ends_with("/roof-repair.htm")));

        let providers = &result.urls[10..];
        assert!(providers
            .iter()
            .all(|u| ["http://x/dir/acme", "http://x/dir/bolt", "http://x/dir/crane"]
                .contains(&u.as_str())));
    }

    #[test]
    fn test_geo_flat_form_without_full_geo() {
        let sources = geo_sources();
        let mut policy = geo_policy(false, 0.0);
        policy.states = None;
        policy.geo_category = None;
        policy.service_providers = None;
        policy.cities.as_mut().unwrap().pct = 1.0;
        let run = run("h", "/dir/", 100, Policy::GeoCategory(policy));

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert_eq!(result.len(), 6);
        assert!(result.urls.contains(&"http://x/dir/san-francisco".to_string()));
        assert!(result.urls.iter().all(|u| u.matches('/').count() == 4));
    }

    #[test]
    fn test_geo_malformed_records_dropped() {
        let mut sources = geo_sources();
        sources.insert(csv_source("geo_cities", "us,ca,sf\nnot-a-record\nus,,la\n"));
        let mut policy = geo_policy(false, 1.0);
        policy.states = None;
        policy.geo_category = None;
        policy.service_providers = None;
        let run = run("h", "/dir", 10, Policy::GeoCategory(policy));

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert_eq!(result.urls, vec!["http://x/dir/us/ca/sf".to_string()]);
        assert_eq!(result.buckets[0].drawn, 3);
        assert_eq!(result.buckets[0].rejected(), 2);
    }

    #[test]
    fn test_geo_quoted_city_fields() {
        let mut sources = geo_sources();
        sources.insert(csv_source(
            "geo_cities",
            "us,dc,\"Washington, D.C.\"\n\"us\",\"ca\",\"sf\"\n",
        ));
        let mut policy = geo_policy(false, 1.0);
        policy.states = None;
        policy.geo_category = None;
        policy.service_providers = None;
        policy.cities.as_mut().unwrap().pct = 1.0;
        let run = run("h", "/dir", 10, Policy::GeoCategory(policy));

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert_eq!(result.buckets[0].rejected(), 0);
        let urls: HashSet<&str> = result.urls.iter().map(String::as_str).collect();
        assert_eq!(
            urls,
            HashSet::from(["http://x/dir/us/dc/washington,-d.c.", "http://x/dir/us/ca/sf"])
        );
    }

    #[test]
    fn test_geo_base_urls_always_emitted() {
        let sources = geo_sources();

        for count in [1, 2] {
            let run = run("h", "/dir", count, Policy::GeoCategory(geo_policy(true, 1.0)));
            let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

            assert_eq!(result.urls, vec!["http://x/dir", "http://x/dir/us"]);
            assert!(result.buckets.iter().all(|b| b.drawn == 0));
        }

        // One URL of budget left: every non-empty bucket floors at 1
        let run = run("h", "/dir", 3, Policy::GeoCategory(geo_policy(true, 1.0)));
        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();
        assert_eq!(&result.urls[..2], ["http://x/dir", "http://x/dir/us"]);
        let drawn: Vec<usize> = result.buckets.iter().map(|b| b.drawn).collect();
        assert_eq!(drawn, vec![1, 1, 1, 1]);
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn test_weight_sum_divergence() {
        assert_eq!(weight_sum_divergence(1.0), None);
        assert_eq!(weight_sum_divergence(0.2 + 0.3 + 0.3 + 0.2), None);
        assert_eq!(weight_sum_divergence(1.0 + 1e-7), None);

        let over = weight_sum_divergence(1.5).unwrap();
        assert!((over - 0.5).abs() < 1e-12);
        let under = weight_sum_divergence(0.7).unwrap();
        assert!((under + 0.3).abs() < 1e-12);
        assert!(weight_sum_divergence(f64::NAN).is_some());
    }

    #[test]
    fn test_geo_category_without_categories() {
        let mut sources = geo_sources();
        sources.insert(source("categories", &[]));
        let mut policy = geo_policy(false, 1.0);
        policy.states = None;
        policy.cities = None;
        policy.service_providers = None;
        let run = run("h", "/dir", 10, Policy::GeoCategory(policy));

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();

        assert!(result.is_empty());
        assert_eq!(result.buckets[0].rejected(), result.buckets[0].drawn);
    }

    #[test]
    fn test_geo_unknown_host() {
        let sources = geo_sources();
        let run = run("ghost", "/dir", 10, Policy::GeoCategory(geo_policy(true, 0.5)));

        let result = UrlGenerator::new(&run, &sources, Some(42)).generate();
        assert!(result.is_empty());
        assert!(result.buckets.is_empty());
    }
}
