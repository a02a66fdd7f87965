//! Validate command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::{HmicError, Result};
use crate::output::{plural, Printer};
use crate::parser::parse_file;
use crate::validation::{print_diagnostics, validate_document, ValidationResult};

/// Check HMIC/HMIC7 files for problems a lenient parse tolerates
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Validate every file; fails if any file has errors or cannot be read.
pub fn run(args: ValidateArgs, config: &Config, printer: &Printer) -> Result<Vec<ValidationResult>> {
    let mut results = Vec::with_capacity(args.files.len());
    let mut failed = 0usize;

    for file in &args.files {
        let doc = parse_file(file, config.parser, config.chunk_size, None)?;
        let result = validate_document(&doc);
        let name = printer.path(file);

        if result.has_errors() {
            failed += 1;
            printer.error(
                "Invalid",
                &format!(
                    "{} ({}, {})",
                    name,
                    plural(result.error_count(), "error", "errors"),
                    plural(result.warning_count(), "warning", "warnings")
                ),
            );
        } else if result.warning_count() > 0 {
            printer.warning(
                "Checked",
                &format!(
                    "{} ({})",
                    name,
                    plural(result.warning_count(), "warning", "warnings")
                ),
            );
        } else {
            printer.status("Valid", &name);
        }
        print_diagnostics(&result);
        results.push(result);
    }

    if failed > 0 {
        return Err(HmicError::Validation {
            message: format!(
                "{} of {} invalid",
                plural(failed, "file", "files"),
                args.files.len()
            ),
            help: None,
        });
    }

    Ok(results)
}
