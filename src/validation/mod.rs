//! Opt-in strictness for parsed documents.
//!
//! Parsing never fails on malformed content. `hmic validate` runs these
//! checks afterwards and reports what a lenient parse silently skipped
//! or tolerated.

pub mod checks;
mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::types::Document;

/// Run all validation checks against a document, sorted by frame.
pub fn validate_document(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_header(doc));
    result.merge(checks::check_frames(doc));
    result.merge(checks::check_colours(doc));
    result.merge(checks::check_bounds(doc));
    result.merge(checks::check_overlaps(doc));

    result.sort();
    result
}

/// Print diagnostics to stderr, indented under a file heading.
pub fn print_diagnostics(result: &ValidationResult) {
    for d in result {
        eprintln!("  {}", d);
        if let Some(help) = &d.help {
            eprintln!("    help: {}", help);
        }
    }
}
