//! Markdown reports
//!
//! Human-readable renderings of a validation probe and of a crawl, for
//! driver authors reading terminal output or pasting into an issue.

use crate::config::{Driver, SelectorRole, Stage};
use crate::model::ValidationResult;
use crate::output::stats::CrawlStatistics;

/// Formats a validation result as markdown
///
/// One table per stage lists every role of that stage: its count when it
/// was evaluated, `not configured` when the driver has no selector for it,
/// and `not reached` when the probe stopped before that stage's page.
pub fn format_validation_report(driver: &Driver, result: &ValidationResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Driver Validation: {}\n\n", driver.display_name()));
    let verdict = if result.is_valid() { "complete" } else { "stopped early" };
    md.push_str(&format!("- **Driver**: {} v{}\n", driver.id, driver.version));
    md.push_str(&format!("- **Probe**: {}\n\n", verdict));

    let stages = [
        (Stage::Catalog, "Catalog page", &result.pages.catalog),
        (Stage::Entry, "Entry page", &result.pages.entry),
        (Stage::SubEntry, "Sub-entry page", &result.pages.sub_entry),
    ];

    for (stage, heading, page) in stages {
        md.push_str(&format!("## {}\n\n", heading));
        match page {
            Some(url) => md.push_str(&format!("{}\n\n", url)),
            None => md.push_str("_not reached_\n\n"),
        }

        md.push_str("| Role | Selector | Matches |\n");
        md.push_str("|------|----------|---------|\n");
        for role in stage.roles() {
            let selector = driver.config.selectors.get(*role);
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                role,
                selector.map(|s| format!("`{s}`")).unwrap_or_else(|| "-".to_string()),
                count_cell(*role, selector.is_some(), page.is_some(), result)
            ));
        }
        md.push('\n');
    }

    if !result.errors.is_empty() {
        md.push_str("## Errors\n\n");
        for error in &result.errors {
            md.push_str(&format!("- {}\n", error));
        }
        md.push('\n');
    }

    let unmatched = result.unmatched_roles();
    if !unmatched.is_empty() {
        md.push_str("## Selectors Matching Nothing\n\n");
        for role in unmatched {
            md.push_str(&format!("- {}\n", role));
        }
        md.push('\n');
    }

    md
}

fn count_cell(
    role: SelectorRole,
    configured: bool,
    reached: bool,
    result: &ValidationResult,
) -> String {
    match result.counts.get(&role) {
        Some(0) => "**0**".to_string(),
        Some(n) => n.to_string(),
        None if !configured => "not configured".to_string(),
        None if !reached => "not reached".to_string(),
        None => "-".to_string(),
    }
}

/// Formats crawl statistics as markdown
pub fn format_crawl_summary(driver: &Driver, stats: &CrawlStatistics, errors: &[String]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Crawl Summary: {}\n\n", driver.display_name()));

    md.push_str("## Catalog\n\n");
    md.push_str(&format!("- **Entries**: {}\n", stats.entries));
    md.push_str(&format!("- **With cover**: {}\n", stats.entries_with_cover));
    md.push_str(&format!("- **With synopsis**: {}\n", stats.entries_with_synopsis));
    md.push_str(&format!(
        "- **With sub-entries**: {} ({:.2}%)\n",
        stats.entries_with_sub_entries,
        stats.sub_entry_coverage()
    ));
    md.push_str(&format!("- **Sub-entries**: {}\n\n", stats.sub_entries));

    md.push_str("## Errors\n\n");
    md.push_str("| Kind | Count |\n");
    md.push_str("|------|-------|\n");
    md.push_str(&format!("| Item | {} |\n", stats.item_errors));
    md.push_str(&format!("| Page | {} |\n", stats.page_errors));
    md.push_str(&format!("| Fetch | {} |\n\n", stats.fetch_errors));

    for error in errors {
        md.push_str(&format!("- {}\n", error));
    }

    md
}
