//! Greenhouse job board API
//!
//! `GET {base}/v1/boards/{slug}/jobs?content=true`

use crate::extract::{company_from_slug, endpoint, fetch_json, first_present, lenient};
use crate::fetch::Fetcher;
use crate::record::{RawListing, Source};
use crate::ExtractError;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JobsResponse {
    jobs: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Job {
    title: Option<String>,
    absolute_url: Option<String>,
    location: Option<Named>,
    updated_at: Option<String>,
    created_at: Option<String>,
    departments: Option<Vec<Named>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Named {
    name: Option<String>,
}

/// Jobs endpoint for a board slug
pub fn jobs_endpoint(base: &str, slug: &str) -> String {
    endpoint(base, &format!("v1/boards/{}/jobs?content=true", slug))
}

/// Fetches every job on a Greenhouse board
pub async fn extract(
    fetcher: &Fetcher,
    base: &str,
    slug: &str,
) -> Result<Vec<RawListing>, ExtractError> {
    let url = jobs_endpoint(base, slug);
    tracing::debug!("Fetching Greenhouse board '{}' from {}", slug, url);

    let response: JobsResponse = fetch_json(fetcher, &url).await?;
    Ok(listings_from(response, slug))
}

/// Maps a decoded jobs payload onto raw listings
///
/// A payload without `jobs` yields no listings; a job of unexpected shape
/// yields an empty listing that validation will reject.
pub fn parse_payload(body: &str, slug: &str) -> Result<Vec<RawListing>, serde_json::Error> {
    let response: JobsResponse = serde_json::from_str(body)?;
    Ok(listings_from(response, slug))
}

fn listings_from(response: JobsResponse, slug: &str) -> Vec<RawListing> {
    let company = company_from_slug(slug);

    response
        .jobs
        .unwrap_or_default()
        .into_iter()
        .map(lenient::<Job>)
        .map(|job| RawListing {
            date: first_present(&[job.updated_at.as_ref(), job.created_at.as_ref()]),
            location: job.location.and_then(|l| l.name),
            department: job
                .departments
                .unwrap_or_default()
                .into_iter()
                .find_map(|d| d.name.filter(|n| !n.trim().is_empty())),
            title: job.title,
            url: job.absolute_url,
            company: Some(company.clone()),
            source: Source::Greenhouse,
        })
        .collect()
}
