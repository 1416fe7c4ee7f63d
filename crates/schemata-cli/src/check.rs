//! # Check Subcommand
//!
//! Validates a model file against the metamodel and lists its schemas, or
//! prints every diagnostic that rejected it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use schemata_core::Options;
use schemata_engine::{load_model, LoadError, ModelError};

/// Arguments for the `schemata check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Model file (.json, .yaml, .yml).
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the model is valid, 1 when the metamodel
/// rejects it.
pub fn run_check(args: &CheckArgs, out: &mut impl Write) -> Result<u8> {
    match load_model(&args.model, Options::new()) {
        Ok(model) => {
            let names: Vec<&str> = model.schema_names().collect();
            writeln!(
                out,
                "OK: {} ({} schema(s): {})",
                args.model.display(),
                names.len(),
                names.join(", ")
            )?;
            Ok(0)
        }
        Err(LoadError::Model(ModelError::InvalidModel { errors, warnings })) => {
            writeln!(
                out,
                "FAIL: {}: {} error(s), {} warning(s) against the metamodel",
                args.model.display(),
                errors.len(),
                warnings.len()
            )?;
            for diagnostic in &errors {
                writeln!(out, "  error: {diagnostic}")?;
            }
            for diagnostic in &warnings {
                writeln!(out, "  warning: {diagnostic}")?;
            }
            Ok(1)
        }
        Err(err) => Err(err).with_context(|| format!("failed to check {}", args.model.display())),
    }
}
