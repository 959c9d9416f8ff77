//! URL handling module for Sumi-Catalog
//!
//! This module turns the hrefs found in third-party markup into absolute
//! URLs and derives the few URL facts the extractors need (host, slug).

mod domain;
mod resolve;
mod slug;

pub use domain::{extract_domain, host_matches};
pub use resolve::{is_absolute_http, resolve_url};
pub use slug::last_path_segment;
