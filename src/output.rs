//! CLI output formatting.
//!
//! Each command has a `format_*` function that returns lines (pure, no I/O,
//! tested below) and a `print_*` wrapper that writes them to stdout. Logging
//! goes through `tracing`; this module is only the human-readable report.
//!
//! # Output Format
//!
//! ## Load (shared by `build` and `check`)
//!
//! ```text
//! Tables
//!     beers        5901  beers.csv
//!     breweries    1414  breweries.csv
//!     geocodes     1414  breweries_geocode.csv
//!     categories     11  categories.csv
//!     styles        141  styles.csv
//! ```
//!
//! ## Check
//!
//! ```text
//! Unmatched beers (2)
//! 001 Orphan Ale
//!     id 17, brewery_id 9999
//! ```
//!
//! ## Build
//!
//! ```text
//! Breweries: 1409 directories created
//! Index documents: 1409 written, 4480 already present
//! Beer documents: 5889 written (53 disambiguated)
//! Unmatched beers: 12 skipped
//! ```

use crate::config::InputConfig;
use crate::generate::Report;
use crate::types::{Beer, Dataset};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Load
// ============================================================================

pub fn format_load_output(dataset: &Dataset, input: &InputConfig) -> Vec<String> {
    let rows = [
        ("beers", dataset.beers.len(), &input.beers),
        ("breweries", dataset.breweries.len(), &input.breweries),
        ("geocodes", dataset.geocodes.len(), &input.geocodes),
        ("categories", dataset.categories.len(), &input.categories),
        ("styles", dataset.styles.len(), &input.styles),
    ];
    let width = rows
        .iter()
        .map(|(_, n, _)| n.to_string().len())
        .max()
        .unwrap_or(1);

    let mut lines = vec!["Tables".to_string()];
    for (table, count, file) in rows {
        lines.push(format!("{}{table:<10} {count:>width$}  {file}", indent(1)));
    }
    lines
}

pub fn print_load_output(dataset: &Dataset, input: &InputConfig) {
    for line in format_load_output(dataset, input) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(unmatched: &[&Beer]) -> Vec<String> {
    if unmatched.is_empty() {
        return vec!["All beers resolve to a brewery".to_string()];
    }
    let mut lines = vec![format!("Unmatched beers ({})", unmatched.len())];
    for (i, beer) in unmatched.iter().enumerate() {
        let title = if beer.name.is_empty() {
            "(unnamed)"
        } else {
            beer.name.as_str()
        };
        lines.push(format!("{} {}", format_index(i + 1), title));
        lines.push(format!(
            "{}id {}, brewery_id {}",
            indent(1),
            beer.id,
            beer.brewery_id
        ));
    }
    lines
}

pub fn print_check_output(unmatched: &[&Beer]) {
    for line in format_check_output(unmatched) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &Report, root: &Path) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Breweries: {} created",
            plural(report.directories_created, "directory", "directories")
        ),
        format!(
            "Index documents: {} written, {} already present",
            report.indexes_written, report.indexes_existing
        ),
        format!(
            "Beer documents: {} written ({} disambiguated)",
            report.elements_written, report.disambiguated
        ),
        format!("Unmatched beers: {} skipped", report.unmatched),
    ];
    if !report.failures.is_empty() {
        lines.push(format!("Failed ({})", report.failures.len()));
        for failure in &report.failures {
            let shown = failure.path.strip_prefix(root).unwrap_or(&failure.path);
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                shown.display(),
                failure.reason
            ));
        }
    }
    lines
}

pub fn print_build_output(report: &Report, root: &Path) {
    for line in format_build_output(report, root) {
        println!("{}", line);
    }
}
