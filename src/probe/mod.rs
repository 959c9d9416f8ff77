//! Driver validation probe
//!
//! Walks one catalog page, the first entry it links to and the first
//! sub-entry of that entry, counting how many elements each configured
//! selector role matches on the page of its stage. Nothing is persisted;
//! the result tells a driver author which selectors are broken and where
//! the chain stopped.

mod validator;

pub use validator::{first_link, validate};
