//! # File Loading
//!
//! Reads values, option sets, and models from `.json`, `.yaml`, or `.yml`
//! files. The format is chosen from the extension.
//!
//! YAML goes through `serde_yaml::Value` first so that documents using
//! non-string scalar keys (`1: one`, `true: yes`) still load: such keys
//! are rendered to strings. Tags are ignored.

use std::path::Path;

use serde::de::DeserializeOwned;

use schemata_core::{Map, Options, Value};

use crate::error::LoadError;
use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format, LoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

fn read(path: &Path) -> Result<(Format, String), LoadError> {
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok((format, content))
}

fn parse_error(path: &Path, reason: impl std::fmt::Display) -> LoadError {
    LoadError::Parse {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Parse `content` as a value in the given format.
fn parse_value(path: &Path, format: Format, content: &str) -> Result<Value, LoadError> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(path, format!("invalid JSON: {e}"))),
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| parse_error(path, format!("invalid YAML: {e}")))?;
            yaml_to_value(&yaml).map_err(|reason| LoadError::Conversion {
                path: path.display().to_string(),
                reason,
            })
        }
    }
}

fn parse_typed<T: DeserializeOwned>(path: &Path, format: Format, content: &str) -> Result<T, LoadError> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(path, e)),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(path, e)),
    }
}

/// Load a value from a JSON or YAML file.
pub fn load_value(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let (format, content) = read(path)?;
    parse_value(path, format, &content)
}

/// Load an option set from a JSON or YAML file. Unknown keys are rejected.
pub fn load_options(path: impl AsRef<Path>) -> Result<Options, LoadError> {
    let path = path.as_ref();
    let (format, content) = read(path)?;
    if content.trim().is_empty() {
        return Ok(Options::new());
    }
    parse_typed(path, format, &content)
}

/// Load a model specification from a file and construct a [`Model`].
pub fn load_model(path: impl AsRef<Path>, options: Options) -> Result<Model, LoadError> {
    let path = path.as_ref();
    let spec = load_value(path)?;
    let model = Model::new(&spec, options)?;
    tracing::debug!(path = %path.display(), "loaded model");
    Ok(model)
}

/// Convert a `serde_yaml::Value` into a [`Value`].
fn yaml_to_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Number(f))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq.iter().map(yaml_to_value).collect::<Result<Vec<_>, _>>().map(Value::List),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                map.insert(key, yaml_to_value(v)?);
            }
            Ok(Value::Map(map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}
