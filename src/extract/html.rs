//! Generic career page fallback
//!
//! Any anchor whose href looks like a job path is taken as a listing. The
//! heuristic is deliberately loose: it will pick up some navigation links and
//! miss boards that render with JavaScript.

use crate::fetch::{FetchKind, Fetcher};
use crate::record::{RawListing, Source};
use crate::robots::RobotsChecker;
use crate::ExtractError;
use scraper::{Html, Selector};
use url::Url;

/// Lowercased href fragments that mark a job link
pub const JOB_PATH_MARKERS: &[&str] = &["/job", "/jobs/", "/careers/"];

/// Title used when an anchor has no visible text
pub const FALLBACK_TITLE: &str = "Job";

/// Fetches a career page and collects its job links
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for the page request
/// * `robots` - Checker consulted when the page redirects to another origin
/// * `robots_token` - Product token matched against `User-agent` lines
/// * `page` - The career page; its own robots.txt must already allow it
///
/// # Returns
///
/// * `Ok(Vec<RawListing>)` - One listing per job-looking anchor, possibly none
/// * `Err(ExtractError::RedirectDisallowed)` - The page redirected to an
///   origin whose robots.txt disallows the final URL
/// * `Err(ExtractError::Fetch)` - The page could not be retrieved
pub async fn extract(
    fetcher: &Fetcher,
    robots: &RobotsChecker,
    robots_token: &str,
    page: &Url,
) -> Result<Vec<RawListing>, ExtractError> {
    let fetched = fetcher.fetch(page.as_str(), FetchKind::Html).await?;

    // Relative links resolve against where the page actually ended up
    let base = Url::parse(&fetched.final_url).unwrap_or_else(|_| page.clone());

    if base.origin() != page.origin() && !robots.can_fetch(base.as_str(), robots_token).await {
        return Err(ExtractError::RedirectDisallowed {
            from: page.to_string(),
            to: base.to_string(),
        });
    }

    Ok(extract_job_links(&fetched.body, &base))
}

/// Parses HTML and returns one listing per job-looking anchor
///
/// # Example
///
/// ```
/// use hiring_radar::extract::html::extract_job_links;
/// use url::Url;
///
/// let html = r#"<a href="/jobs/42">Data Engineer</a><a href="/about">About</a>"#;
/// let base = Url::parse("https://acme.io/careers").unwrap();
/// let listings = extract_job_links(html, &base);
/// assert_eq!(listings.len(), 1);
/// assert_eq!(listings[0].url.as_deref(), Some("https://acme.io/jobs/42"));
/// ```
pub fn extract_job_links(html: &str, base_url: &Url) -> Vec<RawListing> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            if !is_job_href(href) {
                return None;
            }
            let url = resolve_link(href, base_url)?;

            let text = element.text().collect::<Vec<_>>().join(" ");
            let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let title = if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title
            };

            Some(RawListing {
                title: Some(title),
                url: Some(url),
                ..RawListing::new(Source::Unknown)
            })
        })
        .collect()
}

/// Returns true if the lowercased href contains a job path marker
pub fn is_job_href(href: &str) -> bool {
    let lowered = href.to_lowercase();
    JOB_PATH_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for `javascript:`, `mailto:` and other non-web targets.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
