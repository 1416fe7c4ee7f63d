//! # Validate Subcommand
//!
//! Loads a model and a document, validates the document against one schema
//! of the model, and prints the result:
//!
//! ```text
//! {"status": "ok", "meta": {"sanitized": ..., "warnings": [...]}}
//! {"status": "errors", "meta": {"list": [...]}}
//! ```
//!
//! Option precedence, lowest first: built-in defaults, the `--options`
//! file, then the `--regex-as-string` / `--hide-confidential` flags.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use schemata_core::Options;
use schemata_engine::{load_model, load_options, load_value};

use crate::{write_document, OutputFormat};

/// Arguments for the `schemata validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Model file (.json, .yaml, .yml).
    #[arg(long, short = 'm', value_name = "FILE")]
    pub model: PathBuf,

    /// Schema to validate against. Defaults to the `default_schema` option.
    #[arg(long, short = 's', value_name = "NAME")]
    pub schema: Option<String>,

    /// Options file (.json, .yaml, .yml).
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Render compiled regexes as `/pattern/flags` strings.
    #[arg(long)]
    pub regex_as_string: bool,

    /// Replace confidential strings with a placeholder.
    #[arg(long)]
    pub hide_confidential: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Document to validate.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

impl ValidateArgs {
    /// The option set these arguments describe.
    pub fn resolve_options(&self) -> Result<Options> {
        let mut options = match &self.options {
            Some(path) => load_options(path)
                .with_context(|| format!("failed to load options from {}", path.display()))?,
            None => Options::new(),
        };
        if self.regex_as_string {
            options.regex_as_string = Some(true);
        }
        if self.hide_confidential {
            options.hide_confidential = Some(true);
        }
        Ok(options)
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document is accepted, 1 when it is
/// rejected.
pub fn run_validate(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let options = args.resolve_options()?;
    let model = load_model(&args.model, options.clone())
        .with_context(|| format!("failed to load model {}", args.model.display()))?;
    let input = load_value(&args.input)
        .with_context(|| format!("failed to load input {}", args.input.display()))?;

    let outcome = match &args.schema {
        Some(name) => model.validate(&input, name, &Options::new()),
        None => model.validate_default(&input, &Options::new()),
    }
    .context("validation aborted")?;

    tracing::info!(
        input = %args.input.display(),
        ok = outcome.is_ok(),
        errors = outcome.errors().len(),
        warnings = outcome.warnings().len(),
        "validated document"
    );

    write_document(out, &outcome, args.format)?;
    Ok(if outcome.is_ok() { 0 } else { 1 })
}
