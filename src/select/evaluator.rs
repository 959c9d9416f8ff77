use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// A selector string the HTML engine could not compile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector '{selector}': {reason}")]
pub struct SelectorSyntaxError {
    pub selector: String,
    pub reason: String,
}

/// Anything selectors can be evaluated against
///
/// Implemented for a borrowed document and for a single element, so the
/// extractors can query a whole page or one container the same way. Both
/// are cheap copies.
pub trait DocumentLike<'a>: Copy {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;
}

impl<'a> DocumentLike<'a> for &'a Html {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        (*self).select(selector).collect()
    }
}

impl<'a> DocumentLike<'a> for ElementRef<'a> {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

/// Compiles selector text
pub fn compile(selector: &str) -> Result<Selector, SelectorSyntaxError> {
    Selector::parse(selector.trim()).map_err(|e| SelectorSyntaxError {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Evaluates a selector, keeping the syntax error
///
/// Empty or whitespace-only selector text yields no matches.
pub fn try_query_all<'a, R>(
    root: R,
    selector: &str,
) -> Result<Vec<ElementRef<'a>>, SelectorSyntaxError>
where
    R: DocumentLike<'a>,
{
    if selector.trim().is_empty() {
        return Ok(Vec::new());
    }

    let compiled = compile(selector)?;
    Ok(root.select_all(&compiled))
}

/// Returns every element under `root` matching `selector`, in document order
///
/// Absent, empty and invalid selectors all yield an empty vector.
pub fn query_all<'a, R>(root: R, selector: Option<&str>) -> Vec<ElementRef<'a>>
where
    R: DocumentLike<'a>,
{
    let Some(selector) = selector else {
        return Vec::new();
    };

    match try_query_all(root, selector) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!("{}", e);
            Vec::new()
        }
    }
}

/// First match of [`query_all`]
pub fn query_first<'a, R>(root: R, selector: Option<&str>) -> Option<ElementRef<'a>>
where
    R: DocumentLike<'a>,
{
    query_all(root, selector).into_iter().next()
}

/// Like [`query_all`] on an element, but the element itself comes first
/// when it matches
///
/// Covers drivers whose list selector already lands on the anchor
/// (`a.episode`) while the URL selector is plain `a`.
pub fn query_all_or_self<'a>(
    element: ElementRef<'a>,
    selector: Option<&str>,
) -> Vec<ElementRef<'a>> {
    let Some(text) = selector.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let compiled = match compile(text) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("{}", e);
            return Vec::new();
        }
    };

    let mut matches = Vec::new();
    if compiled.matches(&element) {
        matches.push(element);
    }
    matches.extend(element.select(&compiled));
    matches
}

/// Number of matches, for diagnostics and validation counts
pub fn count_matches<'a, R>(root: R, selector: &str) -> usize
where
    R: DocumentLike<'a>,
{
    query_all(root, Some(selector)).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <div class="card"><a class="link" href="/a">A</a></div>
            <div class="card"><a class="link" href="/b">B</a></div>
            <p>outside</p>
        </body></html>
    "#;

    #[test]
    fn test_query_all_in_document_order() {
        let doc = Html::parse_document(PAGE);
        let links = query_all(&doc, Some("a.link"));
        let hrefs: Vec<_> = links.iter().filter_map(|a| a.value().attr("href")).collect();
        assert_eq!(hrefs, vec!["/a", "/b"]);
    }

    #[test]
    fn test_invalid_selector_yields_nothing() {
        let doc = Html::parse_document(PAGE);
        for bad in ["div[", "::::", "#", "[["] {
            assert!(query_all(&doc, Some(bad)).is_empty(), "selector {bad}");
            assert!(query_first(&doc, Some(bad)).is_none());
        }
    }

    #[test]
    fn test_invalid_selector_error_is_kept() {
        let doc = Html::parse_document(PAGE);
        let err = try_query_all(&doc, "div[").unwrap_err();
        assert_eq!(err.selector, "div[");
    }

    #[test]
    fn test_absent_and_blank_selector() {
        let doc = Html::parse_document(PAGE);
        assert!(query_all(&doc, None).is_empty());
        assert!(query_all(&doc, Some("   ")).is_empty());
    }

    #[test]
    fn test_scoped_to_element() {
        let doc = Html::parse_document(PAGE);
        let cards = query_all(&doc, Some(".card"));
        assert_eq!(cards.len(), 2);

        let inner = query_all(cards[1], Some("a"));
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].value().attr("href"), Some("/b"));
    }

    #[test]
    fn test_element_query_excludes_self() {
        let doc = Html::parse_document(PAGE);
        let card = query_first(&doc, Some(".card")).unwrap();
        assert!(query_all(card, Some(".card")).is_empty());
    }

    #[test]
    fn test_or_self_includes_matching_element() {
        let doc = Html::parse_document(PAGE);
        let link = query_first(&doc, Some("a.link")).unwrap();
        let matches = query_all_or_self(link, Some("a"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value().attr("href"), Some("/a"));

        let card = query_first(&doc, Some(".card")).unwrap();
        assert_eq!(query_all_or_self(card, Some("a")).len(), 1);
        assert!(query_all_or_self(card, Some("a[")).is_empty());
    }

    #[test]
    fn test_count_matches() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(count_matches(&doc, ".card"), 2);
        assert_eq!(count_matches(&doc, ".missing"), 0);
        assert_eq!(count_matches(&doc, "div["), 0);
    }
}
