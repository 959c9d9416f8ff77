use crate::UrlError;
use url::Url;

/// Resolves a possibly-relative href against a base URL
///
/// # Resolution Rules
///
/// 1. Trim the href; an empty href is rejected
/// 2. An href that already starts with `http://` or `https://` is returned
///    unchanged, provided it parses and names a host
/// 3. Otherwise the base is parsed and the href joined onto it:
///    - `/path` replaces the base path (root-relative)
///    - `path` resolves against the base path (path-relative)
///    - `//host/path` takes the scheme of the base (protocol-relative)
/// 4. The result must be HTTP or HTTPS; `javascript:`, `mailto:`, `data:`
///    and friends are rejected
///
/// # Arguments
///
/// * `href` - The raw href text from the page
/// * `base` - The URL the href is relative to
///
/// # Returns
///
/// * `Ok(String)` - Absolute HTTP(S) URL
/// * `Err(UrlError)` - The base cannot be parsed or the href is unusable
///
/// # Examples
///
/// ```
/// use sumi_catalog::url::resolve_url;
///
/// let url = resolve_url("/anime/one", "https://site.test/catalog").unwrap();
/// assert_eq!(url, "https://site.test/anime/one");
/// ```
pub fn resolve_url(href: &str, base: &str) -> Result<String, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    if has_http_scheme(href) {
        return match Url::parse(href) {
            Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(href.to_string()),
            Ok(_) => Err(UrlError::Parse {
                href: href.to_string(),
                reason: "missing host".to_string(),
            }),
            Err(e) => Err(UrlError::Parse {
                href: href.to_string(),
                reason: e.to_string(),
            }),
        };
    }

    let base_url = Url::parse(base.trim()).map_err(|e| UrlError::InvalidBase {
        base: base.to_string(),
        reason: e.to_string(),
    })?;

    let joined = base_url.join(href).map_err(|e| UrlError::Parse {
        href: href.to_string(),
        reason: e.to_string(),
    })?;

    match joined.scheme() {
        "http" | "https" => Ok(joined.to_string()),
        _ => Err(UrlError::InvalidScheme(href.to_string())),
    }
}

/// Returns true if the string is an absolute HTTP(S) URL with a host
pub fn is_absolute_http(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn has_http_scheme(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
