use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser-like identity; some catalog sites reject default client signatures
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Top-level driver file: fetch settings plus the driver itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    pub driver: Driver,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// A named, versioned extraction recipe for one website
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Site domain, e.g. "site.test"
    pub domain: String,

    /// Semantic version, `MAJOR.MINOR.PATCH`
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub config: DriverConfig,
}

impl Driver {
    /// Name to show in logs and reports
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.domain)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverConfig {
    /// Root for relative-URL resolution on catalog pages
    pub base_url: String,

    #[serde(default)]
    pub selectors: Selectors,

    /// Declared for drivers that page their catalog; not walked by the crawler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_param: Option<String>,
}

/// CSS selector text per role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selectors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_entry_list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_entry_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_entry_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_entry_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link_selector: Option<String>,
}

impl Selectors {
    /// Returns the selector configured for a role
    ///
    /// Whitespace-only selector text counts as not configured.
    pub fn get(&self, role: SelectorRole) -> Option<&str> {
        let raw = match role {
            SelectorRole::EntryList => &self.entry_list,
            SelectorRole::EntryTitle => &self.entry_title,
            SelectorRole::EntryImage => &self.entry_image,
            SelectorRole::EntrySynopsis => &self.entry_synopsis,
            SelectorRole::EntryUrl => &self.entry_url,
            SelectorRole::SubEntryList => &self.sub_entry_list,
            SelectorRole::SubEntryNumber => &self.sub_entry_number,
            SelectorRole::SubEntryTitle => &self.sub_entry_title,
            SelectorRole::SubEntryUrl => &self.sub_entry_url,
            SelectorRole::VideoPlayer => &self.video_player,
            SelectorRole::ExternalLinkSelector => &self.external_link_selector,
        };

        raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Sets the selector for a role
    pub fn set(&mut self, role: SelectorRole, selector: impl Into<String>) {
        let slot = match role {
            SelectorRole::EntryList => &mut self.entry_list,
            SelectorRole::EntryTitle => &mut self.entry_title,
            SelectorRole::EntryImage => &mut self.entry_image,
            SelectorRole::EntrySynopsis => &mut self.entry_synopsis,
            SelectorRole::EntryUrl => &mut self.entry_url,
            SelectorRole::SubEntryList => &mut self.sub_entry_list,
            SelectorRole::SubEntryNumber => &mut self.sub_entry_number,
            SelectorRole::SubEntryTitle => &mut self.sub_entry_title,
            SelectorRole::SubEntryUrl => &mut self.sub_entry_url,
            SelectorRole::VideoPlayer => &mut self.video_player,
            SelectorRole::ExternalLinkSelector => &mut self.external_link_selector,
        };
        *slot = Some(selector.into());
    }

    /// Roles that have a selector, in stage order
    pub fn configured_roles(&self) -> Vec<SelectorRole> {
        SelectorRole::ALL
            .iter()
            .copied()
            .filter(|role| self.get(*role).is_some())
            .collect()
    }
}

/// The page a selector role is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// The listing page with many entries
    Catalog,
    /// One entry's own page, listing its sub-entries
    Entry,
    /// One sub-entry's page (player, external links)
    SubEntry,
}

impl Stage {
    pub fn roles(&self) -> &'static [SelectorRole] {
        match self {
            Self::Catalog => &[
                SelectorRole::EntryList,
                SelectorRole::EntryTitle,
                SelectorRole::EntryImage,
                SelectorRole::EntrySynopsis,
                SelectorRole::EntryUrl,
            ],
            Self::Entry => &[
                SelectorRole::SubEntryList,
                SelectorRole::SubEntryNumber,
                SelectorRole::SubEntryTitle,
                SelectorRole::SubEntryUrl,
            ],
            Self::SubEntry => &[SelectorRole::VideoPlayer, SelectorRole::ExternalLinkSelector],
        }
    }
}

/// A named slot in a driver's selector configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectorRole {
    EntryList,
    EntryTitle,
    EntryImage,
    EntrySynopsis,
    EntryUrl,
    SubEntryList,
    SubEntryNumber,
    SubEntryTitle,
    SubEntryUrl,
    VideoPlayer,
    ExternalLinkSelector,
}

impl SelectorRole {
    pub const ALL: [SelectorRole; 11] = [
        Self::EntryList,
        Self::EntryTitle,
        Self::EntryImage,
        Self::EntrySynopsis,
        Self::EntryUrl,
        Self::SubEntryList,
        Self::SubEntryNumber,
        Self::SubEntryTitle,
        Self::SubEntryUrl,
        Self::VideoPlayer,
        Self::ExternalLinkSelector,
    ];

    pub fn stage(&self) -> Stage {
        match self {
            Self::EntryList
            | Self::EntryTitle
            | Self::EntryImage
            | Self::EntrySynopsis
            | Self::EntryUrl => Stage::Catalog,
            Self::SubEntryList | Self::SubEntryNumber | Self::SubEntryTitle | Self::SubEntryUrl => {
                Stage::Entry
            }
            Self::VideoPlayer | Self::ExternalLinkSelector => Stage::SubEntry,
        }
    }

    /// Roles a driver cannot produce sub-entries without
    pub fn is_required(&self) -> bool {
        matches!(self, Self::SubEntryList | Self::SubEntryUrl)
    }

    /// The camelCase name used in driver files and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntryList => "entryList",
            Self::EntryTitle => "entryTitle",
            Self::EntryImage => "entryImage",
            Self::EntrySynopsis => "entrySynopsis",
            Self::EntryUrl => "entryUrl",
            Self::SubEntryList => "subEntryList",
            Self::SubEntryNumber => "subEntryNumber",
            Self::SubEntryTitle => "subEntryTitle",
            Self::SubEntryUrl => "subEntryUrl",
            Self::VideoPlayer => "videoPlayer",
            Self::ExternalLinkSelector => "externalLinkSelector",
        }
    }
}

impl fmt::Display for SelectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
