//! Selector evaluation over parsed HTML
//!
//! Selector text in drivers is written by people and by generators, so
//! nothing in this module panics or errors on bad input: a selector that
//! does not compile simply matches nothing. The compile error stays
//! available through [`compile`] for diagnostics.

mod containers;
mod element;
mod evaluator;

pub use containers::Containers;
pub use element::{element_text, first_href, href_of, image_source, is_anchor, non_empty_attr};
pub use evaluator::{
    compile, count_matches, query_all, query_all_or_self, query_first, try_query_all,
    DocumentLike, SelectorSyntaxError,
};
