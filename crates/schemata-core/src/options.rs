//! # Validation Options
//!
//! Context-wide switches that affect how sanitized output is rendered and
//! how far the validator may recurse. Every field is optional so option
//! sets can be layered: per-call options override the defaults a model was
//! constructed with, which in turn override the built-in defaults.
//!
//! Options deserialize from any serde format; unknown keys are rejected so
//! a misspelled switch in a config file fails loudly.

use serde::{Deserialize, Serialize};

/// Recursion limit used when no `max_depth` is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Placeholder substituted for confidential strings when
/// `hide_confidential` is set.
pub const CONFIDENTIAL_PLACEHOLDER: &str = "(confidential)";

/// A layered set of validation options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Render compiled patterns back to `/pattern/flags` strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_as_string: Option<bool>,

    /// Replace strings whose schema is marked `confidential` with
    /// [`CONFIDENTIAL_PLACEHOLDER`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_confidential: Option<bool>,

    /// Maximum recursion depth before validation is aborted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Schema used when a caller does not name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,
}

impl Options {
    /// An empty option set (every switch at its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `regex_as_string`.
    pub fn with_regex_as_string(mut self, on: bool) -> Self {
        self.regex_as_string = Some(on);
        self
    }

    /// Set `hide_confidential`.
    pub fn with_hide_confidential(mut self, on: bool) -> Self {
        self.hide_confidential = Some(on);
        self
    }

    /// Set `max_depth`.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set `default_schema`.
    pub fn with_default_schema(mut self, name: impl Into<String>) -> Self {
        self.default_schema = Some(name.into());
        self
    }

    /// Layer `overrides` on top of `self`: every field set in `overrides`
    /// wins, every unset field falls back to `self`.
    pub fn merge(&self, overrides: &Options) -> Options {
        Options {
            regex_as_string: overrides.regex_as_string.or(self.regex_as_string),
            hide_confidential: overrides.hide_confidential.or(self.hide_confidential),
            max_depth: overrides.max_depth.or(self.max_depth),
            default_schema: overrides
                .default_schema
                .clone()
                .or_else(|| self.default_schema.clone()),
        }
    }

    /// Effective `regex_as_string`.
    pub fn regex_as_string(&self) -> bool {
        self.regex_as_string.unwrap_or(false)
    }

    /// Effective `hide_confidential`.
    pub fn hide_confidential(&self) -> bool {
        self.hide_confidential.unwrap_or(false)
    }

    /// Effective `max_depth`.
    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Effective `default_schema`, if any.
    pub fn default_schema(&self) -> Option<&str> {
        self.default_schema.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::new();
        assert!(!opts.regex_as_string());
        assert!(!opts.hide_confidential());
        assert_eq!(opts.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(opts.default_schema(), None);
    }

    #[test]
    fn test_merge_overrides_win() {
        let base = Options::new()
            .with_regex_as_string(true)
            .with_hide_confidential(true)
            .with_default_schema("person");
        let call = Options::new().with_hide_confidential(false).with_max_depth(8);
        let merged = base.merge(&call);
        assert!(merged.regex_as_string());
        assert!(!merged.hide_confidential());
        assert_eq!(merged.max_depth(), 8);
        assert_eq!(merged.default_schema(), Some("person"));
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let opts: Options = serde_yaml::from_str("hide_confidential: true\n").unwrap();
        assert_eq!(opts, Options::new().with_hide_confidential(true));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = serde_json::from_str::<Options>(r#"{"regex_as_strng": true}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_serialize_skips_unset() {
        let json = serde_json::to_string(&Options::new().with_max_depth(4)).unwrap();
        assert_eq!(json, r#"{"max_depth":4}"#);
    }
}
