//! Console output for the release run.
//!
//! Errors and warnings go to stderr, progress to stdout.

pub mod formatter;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::ReleasePlan;

pub fn display_error(message: &str) {
    eprintln!("{}", formatter::format_error(message));
}

pub fn display_warning(message: &str) {
    eprintln!("{}", formatter::format_warning(message));
}

pub fn display_success(message: &str) {
    println!("{}", formatter::format_success(message));
}

pub fn display_status(message: &str) {
    println!("{}", formatter::format_status(message));
}

pub fn display_boundary_warning(warning: &BoundaryWarning) {
    display_warning(&warning.to_string());
}

pub fn display_commit_analysis(headers: &[&str], range: &str) {
    print!("{}", formatter::format_commit_analysis(headers, range));
}

pub fn display_plan(plan: &ReleasePlan) {
    print!("{}", formatter::format_plan(plan));
}

/// Print a rendered changelog section as a preview
pub fn display_section(section: &str) {
    println!();
    for line in section.lines() {
        println!("  {}", line);
    }
}
