//! # Metamodel Subcommand
//!
//! Prints the schema set every model is checked against, in the same
//! schema language models are written in.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use crate::{write_document, OutputFormat};

/// Arguments for the `schemata metamodel` subcommand.
#[derive(Args, Debug)]
pub struct MetamodelArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Execute the metamodel subcommand. Always returns exit code 0.
pub fn run_metamodel(args: &MetamodelArgs, out: &mut impl Write) -> Result<u8> {
    let value = schemata_engine::metamodel_value().context("failed to build the metamodel")?;
    write_document(out, &value, args.format)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_yaml() {
        let mut out = Vec::new();
        let code = run_metamodel(&MetamodelArgs { format: OutputFormat::Yaml }, &mut out).unwrap();
        assert_eq!(code, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("composite schema:"), "{text}");
    }
}
