//! Driver-driven extraction
//!
//! - [`extract_catalog`]: catalog page → ordered entries
//! - [`extract_sub_entries`]: entry page → ordered sub-entries
//! - [`extract_player_links`]: sub-entry page → video and external links
//!
//! Every extractor records problems in its result instead of failing; one
//! bad container never costs the rest of the page.

mod catalog;
mod fallback;
mod player;
mod sub_entries;

pub use catalog::{extract_catalog, extract_catalog_html};
pub use fallback::{diagnose, CATALOG_FALLBACKS, SUB_ENTRY_FALLBACKS};
pub use player::{extract_player_links, extract_player_links_html, PlayerLinks};
pub use sub_entries::{
    extract_sub_entries, extract_sub_entries_from_document, extract_sub_entries_html,
    parse_first_number,
};
