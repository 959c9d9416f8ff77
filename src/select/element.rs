use scraper::ElementRef;

use super::evaluator::query_first;

/// Image attributes, most specific first; lazy loaders park the real URL in
/// a `data-*` attribute and leave a placeholder in `src`
const IMAGE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];

/// Text content of an element, trimmed with inner whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attribute value, trimmed, if present and non-empty
pub fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Returns true for elements that carry a link themselves
pub fn is_anchor(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "a" | "area") || non_empty_attr(element, "href").is_some()
}

/// The element's own href
pub fn href_of<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    non_empty_attr(element, "href")
}

/// First usable href among matched elements
///
/// A matched element without an href of its own (a title `div` wrapping the
/// link) contributes the href of its first descendant anchor.
pub fn first_href<'a, I>(elements: I) -> Option<&'a str>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    elements.into_iter().find_map(|element| {
        href_of(element).or_else(|| query_first(element, Some("a[href]")).and_then(href_of))
    })
}

/// Image URL of an `<img>`-like element, or of the first `<img>` inside it
///
/// `data:` placeholders are skipped in favour of lazy-load attributes.
pub fn image_source<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    own_image_source(element)
        .or_else(|| query_first(element, Some("img")).and_then(own_image_source))
}

fn own_image_source<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    IMAGE_ATTRS
        .iter()
        .filter_map(|attr| non_empty_attr(element, attr))
        .find(|value| !value.starts_with("data:"))
}
