//! Pure formatting functions for console output.
//!
//! Everything here returns a `String` so it can be tested without capturing
//! stdout; the printing lives in the parent module.

use crate::cli::orchestration::ReleasePlan;
use console::style;

/// Number of commit headers listed before the rest is summarised
pub const COMMIT_PREVIEW_LIMIT: usize = 10;

/// Longest header shown in the commit preview, in characters
const HEADER_PREVIEW_WIDTH: usize = 60;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

pub fn format_warning(message: &str) -> String {
    format!("{} {}", style("WARNING:").yellow(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Commit headers in the analysed range, capped at [`COMMIT_PREVIEW_LIMIT`]
pub fn format_commit_analysis(headers: &[&str], range: &str) -> String {
    let mut out = format!(
        "\n{}\n{}\n",
        style(format!("Analyzing commits in {}", range)).bold(),
        style(format!("{} commit(s):", headers.len())).underlined()
    );

    for (i, header) in headers.iter().take(COMMIT_PREVIEW_LIMIT).enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, truncate(header, HEADER_PREVIEW_WIDTH)));
    }

    if headers.len() > COMMIT_PREVIEW_LIMIT {
        out.push_str(&format!(
            "  ... and {} more commits\n",
            headers.len() - COMMIT_PREVIEW_LIMIT
        ));
    }
    out
}

/// Summary of what a release will change
pub fn format_plan(plan: &ReleasePlan) -> String {
    let mut out = format!("\n{}\n", style("Release plan:").bold());
    if let Some(bump) = plan.bump {
        out.push_str(&format!("  Bump:      {}\n", bump));
    }
    out.push_str(&format!(
        "  Version:   {} -> {}\n",
        style(plan.current_version).red(),
        style(plan.next_version).green()
    ));
    out.push_str(&format!("  Changelog: {}\n", plan.changelog_path.display()));
    if let Some(manifest) = &plan.manifest {
        out.push_str(&format!("  Version file: {}\n", manifest.path.display()));
    }
    out
}

/// Cut a header down to `width` characters, on a char boundary
fn truncate(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
