//! Run coordination
//!
//! For each target: dispatch to a strategy, gate HTML scraping on
//! robots.txt, extract, cap, normalize, validate. A failure in one target
//! never stops the others.
//!
//! Targets are grouped by the host their requests go to: the provider API
//! host for board URLs, the page host otherwise. Groups may run
//! concurrently, but the targets of one group always run one after another
//! in input order, so no server sees more than one request from us at a
//! time.

use crate::config::{Config, ProviderConfig};
use crate::extract::{ExtractContext, Strategy};
use crate::fetch::{ClientIdentity, Fetcher};
use crate::normalize::normalize;
use crate::output::RunStatistics;
use crate::providers::host_key;
use crate::record::{CanonicalRecord, RawListing};
use crate::robots::RobotsChecker;
use crate::validate::validate;
use crate::{ExtractError, FetchError};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use url::Url;

/// Longest robots.txt crawl delay honored before a page fetch
const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Targets ready for dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedTargets {
    /// Distinct absolute http(s) URLs, in first-seen order
    pub urls: Vec<Url>,
    /// Inputs that are not absolute http(s) URLs
    pub skipped: Vec<String>,
}

/// Trims, de-duplicates and parses raw target strings
pub fn prepare_targets<S: AsRef<str>>(raw: &[S]) -> PreparedTargets {
    let mut seen = HashSet::new();
    let mut prepared = PreparedTargets::default();

    for target in raw {
        let target = target.as_ref().trim();
        if target.is_empty() || !seen.insert(target.to_string()) {
            continue;
        }

        match Url::parse(target) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                prepared.urls.push(url)
            }
            _ => prepared.skipped.push(target.to_string()),
        }
    }

    prepared
}

/// Keeps at most `cap` listings; returns the kept listings and the number dropped
pub fn apply_site_cap(mut listings: Vec<RawListing>, cap: usize) -> (Vec<RawListing>, usize) {
    let dropped = listings.len().saturating_sub(cap);
    listings.truncate(cap);
    (listings, dropped)
}

/// Why a target produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingSlug,
    RobotsDenied,
}

/// What happened to one target
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    Skipped(SkipReason),
    Failed(String),
    Processed {
        extracted: usize,
        capped: usize,
        rejected: usize,
        accepted: Vec<CanonicalRecord>,
    },
}

/// Result of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Accepted records, in target input order
    pub records: Vec<CanonicalRecord>,
    pub stats: RunStatistics,
}

impl RunReport {
    fn record(&mut self, outcome: TargetOutcome) {
        match outcome {
            TargetOutcome::Skipped(SkipReason::MissingSlug) => self.stats.skipped_missing_slug += 1,
            TargetOutcome::Skipped(SkipReason::RobotsDenied) => self.stats.robots_denied += 1,
            TargetOutcome::Failed(_) => self.stats.extraction_failures += 1,
            TargetOutcome::Processed {
                extracted,
                capped,
                rejected,
                accepted,
            } => {
                if extracted == 0 {
                    self.stats.empty_targets += 1;
                }
                self.stats.listings_extracted += extracted as u64;
                self.stats.listings_capped += capped as u64;
                self.stats.records_rejected += rejected as u64;
                self.stats.records_accepted += accepted.len() as u64;
                self.records.extend(accepted);
            }
        }
    }
}

/// The extraction pipeline
#[derive(Debug)]
pub struct Pipeline {
    fetcher: Fetcher,
    robots: RobotsChecker,
    providers: ProviderConfig,
    robots_token: String,
    max_per_site: usize,
    max_concurrent_hosts: usize,
}

impl Pipeline {
    /// Builds a pipeline with its own HTTP client
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(
            &config.fetcher,
            ClientIdentity::from_config(&config.user_agent),
        )?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Builds a pipeline around an existing fetcher
    pub fn with_fetcher(config: &Config, fetcher: Fetcher) -> Self {
        Self {
            robots: RobotsChecker::new(fetcher.clone()),
            fetcher,
            providers: config.providers.clone(),
            robots_token: config.user_agent.robots_token().to_string(),
            max_per_site: config.output.max_per_site,
            max_concurrent_hosts: config.fetcher.max_concurrent_hosts.max(1),
        }
    }

    /// Processes every target and collects the accepted records
    pub async fn run<S: AsRef<str>>(&self, targets: &[S]) -> RunReport {
        let prepared = prepare_targets(targets);
        let mut report = RunReport::default();

        report.stats.targets = (prepared.urls.len() + prepared.skipped.len()) as u64;
        report.stats.skipped_non_matching = prepared.skipped.len() as u64;
        for skipped in &prepared.skipped {
            tracing::info!("Skipping non-matching URL: {}", skipped);
        }

        let groups = group_by_host(prepared.urls, |url| self.request_host_key(url));
        let this = self;

        let mut outcomes: Vec<(usize, TargetOutcome)> = stream::iter(groups)
            .map(move |group| async move {
                let mut outcomes = Vec::with_capacity(group.len());
                for (index, url) in group {
                    outcomes.push((index, this.process_target(&url).await));
                }
                outcomes
            })
            .buffer_unordered(self.max_concurrent_hosts)
            .flat_map(stream::iter)
            .collect()
            .await;

        outcomes.sort_by_key(|(index, _)| *index);
        for (_, outcome) in outcomes {
            report.record(outcome);
        }

        report
    }

    /// Host a target's requests go to; unreadable targets fall back to their own host
    fn request_host_key(&self, target: &Url) -> String {
        Strategy::select(target)
            .and_then(|strategy| strategy.request_host_key(&self.providers))
            .or_else(|| host_key(target))
            .unwrap_or_default()
    }

    /// Runs one target through dispatch, extraction, normalization and validation
    pub async fn process_target(&self, target: &Url) -> TargetOutcome {
        let Some(strategy) = Strategy::select(target) else {
            tracing::info!("Skipping {}: no company slug in URL", target);
            return TargetOutcome::Skipped(SkipReason::MissingSlug);
        };

        if strategy.requires_crawl_permission() {
            if !self.robots.can_fetch(target.as_str(), &self.robots_token).await {
                tracing::info!("Skipping {}: disallowed by robots.txt", target);
                return TargetOutcome::Skipped(SkipReason::RobotsDenied);
            }

            if let Some(delay) = self.robots.crawl_delay(target.as_str(), &self.robots_token) {
                let delay = delay.min(MAX_CRAWL_DELAY);
                tracing::debug!("Honoring crawl delay of {:?} for {}", delay, target);
                tokio::time::sleep(delay).await;
            }
        }

        tracing::debug!("Extracting {} via {}", target, strategy);
        let ctx = ExtractContext {
            fetcher: &self.fetcher,
            providers: &self.providers,
            robots: &self.robots,
            robots_token: &self.robots_token,
        };

        let listings = match strategy.extract(ctx).await {
            Ok(listings) => listings,
            Err(e @ ExtractError::RedirectDisallowed { .. }) => {
                tracing::info!("Skipping {}: {}", target, e);
                return TargetOutcome::Skipped(SkipReason::RobotsDenied);
            }
            Err(e) => {
                tracing::warn!("[{:?}] Fetch error for {}: {}", strategy.provider(), target, e);
                return TargetOutcome::Failed(e.to_string());
            }
        };

        if listings.is_empty() {
            tracing::info!("No listings found at {}", target);
        }

        let extracted = listings.len();
        let (listings, capped) = apply_site_cap(listings, self.max_per_site);
        if capped > 0 {
            tracing::info!(
                "Capped {} at {} listings ({} dropped)",
                target,
                self.max_per_site,
                capped
            );
        }

        let mut accepted = Vec::with_capacity(listings.len());
        let mut rejected = 0;

        for raw in &listings {
            let record = normalize(raw);
            let result = validate(&record);

            if result.is_valid() {
                accepted.push(record);
            } else {
                rejected += 1;
                tracing::warn!(
                    "Invalid record '{}': {:?}",
                    record.title.as_deref().unwrap_or("(no title)"),
                    result.errors
                );
            }
        }

        TargetOutcome::Processed {
            extracted,
            capped,
            rejected,
            accepted,
        }
    }
}

/// Groups indexed targets by the key `host_of` gives them, keeping first-seen order
fn group_by_host<F>(urls: Vec<Url>, host_of: F) -> Vec<Vec<(usize, Url)>>
where
    F: Fn(&Url) -> String,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<(usize, Url)>> = Vec::new();

    for (index, url) in urls.into_iter().enumerate() {
        let key = host_of(&url);
        let slot = *positions.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push((index, url));
    }

    groups
}
