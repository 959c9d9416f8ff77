use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_catalog::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Site.test/anime").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.site.test".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a URL's host belongs to a driver domain
///
/// A leading `www.` is ignored on both sides and subdomains of the driver
/// domain match (`cdn.site.test` belongs to `site.test`).
pub fn host_matches(domain: &str, url: &Url) -> bool {
    let Some(host) = extract_domain(url) else {
        return false;
    };

    let domain = domain.trim().to_lowercase();
    let domain = domain.strip_prefix("www.").unwrap_or(&domain);
    let host = host.strip_prefix("www.").unwrap_or(&host);

    host == domain || host.ends_with(&format!(".{domain}"))
}
