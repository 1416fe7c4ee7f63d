//! # schemata-cli — Command-Line Front End
//!
//! Provides the `schemata` binary.
//!
//! ## Subcommands
//!
//! - `schemata validate` — Validate a JSON/YAML document against a model.
//! - `schemata check` — Check a model file against the metamodel.
//! - `schemata metamodel` — Print the metamodel.
//!
//! ```bash
//! schemata validate --model people.yaml --schema directory input.json
//! schemata check people.yaml
//! schemata metamodel --format yaml
//! ```
//!
//! Exit codes: 0 on success, 1 when the input (or model) is rejected, 2 on
//! operational errors such as unreadable files.

pub mod check;
pub mod metamodel;
pub mod validate;

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Output format for documents printed by the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Serialize `value` to `out` in the given format, followed by a newline.
pub fn write_document<T: Serialize>(out: &mut impl Write, value: &T, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("failed to render JSON")?,
        OutputFormat::Yaml => serde_yaml::to_string(value).context("failed to render YAML")?,
    };
    writeln!(out, "{}", text.trim_end()).context("failed to write output")?;
    Ok(())
}
