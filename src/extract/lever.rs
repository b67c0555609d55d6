//! Lever postings API
//!
//! Primary: `GET {lever_api}/v0/postings/{slug}?mode=json`
//! Legacy:  `GET {lever_legacy_api}/v0/postings/{slug}?mode=json`
//!
//! The legacy endpoint is only tried when the primary one fails.

use crate::config::ProviderConfig;
use crate::extract::{company_from_slug, endpoint, fetch_json, first_present, lenient};
use crate::fetch::Fetcher;
use crate::record::{RawListing, Source};
use crate::ExtractError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Posting {
    text: Option<String>,
    title: Option<String>,
    hosted_url: Option<String>,
    apply_url: Option<String>,
    url: Option<String>,
    categories: Option<Categories>,
    created_at: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Categories {
    location: Option<String>,
    department: Option<String>,
    team: Option<String>,
}

/// Postings endpoint for a company slug on the given API base
pub fn postings_endpoint(base: &str, slug: &str) -> String {
    endpoint(base, &format!("v0/postings/{}?mode=json", slug))
}

/// Fetches every posting for a Lever company, falling back to the legacy endpoint
pub async fn extract(
    fetcher: &Fetcher,
    providers: &ProviderConfig,
    slug: &str,
) -> Result<Vec<RawListing>, ExtractError> {
    let primary = postings_endpoint(&providers.lever_api, slug);

    match fetch_postings(fetcher, &primary, slug).await {
        Ok(listings) => Ok(listings),
        Err(e) => {
            tracing::warn!(
                "Lever API failed for '{}': {}; trying legacy endpoint",
                slug,
                e
            );
            let legacy = postings_endpoint(&providers.lever_legacy_api, slug);
            fetch_postings(fetcher, &legacy, slug)
                .await
                .map_err(|last| ExtractError::AllEndpointsFailed {
                    slug: slug.to_string(),
                    last: Box::new(last),
                })
        }
    }
}

async fn fetch_postings(
    fetcher: &Fetcher,
    url: &str,
    slug: &str,
) -> Result<Vec<RawListing>, ExtractError> {
    tracing::debug!("Fetching Lever postings for '{}' from {}", slug, url);
    let postings: Vec<Value> = fetch_json(fetcher, url).await?;
    Ok(listings_from(postings, slug))
}

/// Maps a postings payload (a JSON array) onto raw listings
pub fn parse_payload(body: &str, slug: &str) -> Result<Vec<RawListing>, serde_json::Error> {
    let postings: Vec<Value> = serde_json::from_str(body)?;
    Ok(listings_from(postings, slug))
}

fn listings_from(postings: Vec<Value>, slug: &str) -> Vec<RawListing> {
    let company = company_from_slug(slug);

    postings
        .into_iter()
        .map(lenient::<Posting>)
        .map(|posting| {
            let categories = posting.categories.unwrap_or_default();
            RawListing {
                title: first_present(&[posting.text.as_ref(), posting.title.as_ref()]),
                url: first_present(&[
                    posting.hosted_url.as_ref(),
                    posting.apply_url.as_ref(),
                    posting.url.as_ref(),
                ]),
                location: categories.location,
                date: posting.created_at.as_ref().and_then(timestamp_text),
                department: first_present(&[
                    categories.department.as_ref(),
                    categories.team.as_ref(),
                ]),
                company: Some(company.clone()),
                source: Source::Lever,
            }
        })
        .collect()
}

/// `createdAt` is epoch milliseconds; text timestamps pass through
fn timestamp_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
