use url::Url;

/// Returns the last non-empty path segment of an absolute URL
///
/// Used as a fallback title when a catalog entry has nothing better.
/// Percent-encoding is decoded; query and fragment are ignored.
///
/// ```
/// use sumi_catalog::url::last_path_segment;
///
/// assert_eq!(
///     last_path_segment("https://x.test/anime/my-title/"),
///     Some("my-title".to_string())
/// );
/// assert_eq!(last_path_segment("https://x.test/"), None);
/// ```
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .rfind(|s| !s.is_empty())?
        .to_string();

    let decoded = match urlencoding::decode(&segment) {
        Ok(text) => text.into_owned(),
        Err(_) => segment.clone(),
    };
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
