use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hiring_radar::providers::extract_domain;
///
/// let url = Url::parse("https://BOARDS.greenhouse.io/acme").unwrap();
/// assert_eq!(extract_domain(&url), Some("boards.greenhouse.io".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts `host[:port]`, the key used to keep requests to one server sequential
pub fn host_key(url: &Url) -> Option<String> {
    let domain = extract_domain(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", domain, port),
        None => domain,
    })
}
