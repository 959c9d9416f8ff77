use scraper::{ElementRef, Html};

use super::evaluator::{query_all, query_first};

/// The elements a catalog page is split into, one entry each
///
/// Without a list selector the whole page body is a single implicit
/// container.
#[derive(Debug, Clone)]
pub enum Containers<'a> {
    Explicit(Vec<ElementRef<'a>>),
    ImplicitSingle(ElementRef<'a>),
}

impl<'a> Containers<'a> {
    /// Resolves the containers of a document for an optional list selector
    pub fn from_document(document: &'a Html, list_selector: Option<&str>) -> Self {
        match list_selector.map(str::trim).filter(|s| !s.is_empty()) {
            Some(selector) => Self::Explicit(query_all(document, Some(selector))),
            None => Self::ImplicitSingle(
                query_first(document, Some("body")).unwrap_or_else(|| document.root_element()),
            ),
        }
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self, Self::ImplicitSingle(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Explicit(elements) => elements.len(),
            Self::ImplicitSingle(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<ElementRef<'a>> {
        match self {
            Self::Explicit(elements) => elements,
            Self::ImplicitSingle(element) => vec![element],
        }
    }
}

impl<'a> IntoIterator for Containers<'a> {
    type Item = ElementRef<'a>;
    type IntoIter = std::vec::IntoIter<ElementRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
