//! # Error Types
//!
//! Ordinary invalid input never surfaces here: it produces an
//! [`Outcome::Errors`](crate::outcome::Outcome::Errors) result. The errors
//! in this module abort an operation outright: a model that fails the
//! metamodel, a lookup of a schema the model does not define, and recursion
//! past the configured depth.

use thiserror::Error;

use crate::outcome::Diagnostic;

/// Error raised while building or using a [`Model`](crate::model::Model).
#[derive(Error, Debug)]
pub enum ModelError {
    /// The model specification produced errors or warnings against the
    /// metamodel.
    #[error(
        "invalid model: {} error(s), {} warning(s) against the metamodel",
        errors.len(),
        warnings.len()
    )]
    InvalidModel {
        /// Errors reported by the metamodel.
        errors: Vec<Diagnostic>,
        /// Warnings reported by the metamodel. Any warning rejects a model.
        warnings: Vec<Diagnostic>,
    },

    /// `validate` was asked for a schema the model does not define.
    #[error("cannot validate against unrecognized schema '{0}'")]
    UnknownSchema(String),

    /// `validate_default` was called without a `default_schema` option.
    #[error("no schema name given and no default_schema configured")]
    NoDefaultSchema,

    /// Recursion went deeper than `max_depth`.
    #[error("maximum validation depth {limit} exceeded at {path}")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
        /// Rendered path of the node that tripped the limit.
        path: String,
    },

    /// The built-in metamodel failed to build. Indicates a defect in the
    /// metamodel definition itself.
    #[error("the built-in metamodel is unavailable")]
    MetamodelUnavailable,

    /// A name was used as a primitive but is not one.
    #[error("unknown primitive type '{0}'")]
    UnknownPrimitive(String),

    /// A schema value has the wrong shape for conversion into a typed
    /// schema.
    #[error("malformed schema: {0}")]
    MalformedSchema(String),
}

impl ModelError {
    /// All diagnostics carried by an [`InvalidModel`](Self::InvalidModel)
    /// error, errors first. Empty for every other variant.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        let (errors, warnings) = match self {
            Self::InvalidModel { errors, warnings } => (errors.as_slice(), warnings.as_slice()),
            _ => (&[] as &[Diagnostic], &[] as &[Diagnostic]),
        };
        errors.iter().chain(warnings.iter())
    }
}

/// Error raised while loading values, options, or models from files.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file contents are not valid JSON or YAML.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The parsed document cannot be represented as a value.
    #[error("failed to convert {path}: {reason}")]
    Conversion {
        /// Path that was converted.
        path: String,
        /// What could not be converted.
        reason: String,
    },

    /// The file extension is not one of `.json`, `.yaml`, `.yml`.
    #[error("unsupported file extension for {path}: expected .json, .yaml, or .yml")]
    UnsupportedFormat {
        /// The rejected path.
        path: String,
    },

    /// The loaded model was rejected.
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_exceeded_display() {
        let err = ModelError::DepthExceeded {
            limit: 4,
            path: "$.a[0]".to_string(),
        };
        assert_eq!(err.to_string(), "maximum validation depth 4 exceeded at $.a[0]");
    }

    #[test]
    fn test_diagnostics_empty_for_lookup_errors() {
        let err = ModelError::UnknownSchema("x".to_string());
        assert_eq!(err.diagnostics().count(), 0);
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_load_error_wraps_model_error() {
        let err: LoadError = ModelError::NoDefaultSchema.into();
        assert!(matches!(err, LoadError::Model(ModelError::NoDefaultSchema)));
    }
}
