//! # Model
//!
//! The public entry point. A [`Model`] is built from a model specification
//! (a mapping of schema name to `{type, meta}`), which is first validated
//! against the [metamodel](crate::metamodel). Any error **or warning** is a
//! hard rejection: a model that only validates after coercion is ambiguous
//! about what its author meant.
//!
//! After construction a model is immutable and can be shared across
//! threads; every [`Model::validate`] call builds its own context.

use std::sync::Arc;

use schemata_core::{Options, Value};

use crate::context::Context;
use crate::error::ModelError;
use crate::metamodel::{self, MODEL_SCHEMA};
use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaRef, SchemaSet};
use crate::validator;

/// A validated, immutable set of named schemas.
#[derive(Debug, Clone)]
pub struct Model {
    schemas: SchemaSet,
    options: Options,
}

impl Model {
    /// Validate `spec` against the metamodel and build a model from its
    /// sanitized form. `options` become the defaults for every
    /// [`validate`](Self::validate) call.
    pub fn new(spec: &Value, options: Options) -> Result<Self, ModelError> {
        let meta_options = Options::new()
            .with_regex_as_string(false)
            .with_max_depth(options.max_depth());
        let ctx = Context::new(spec, metamodel::metamodel()?, meta_options);
        let report = validator::validate(&ctx, spec, &SchemaRef::named(MODEL_SCHEMA))?;

        if !report.errors.is_empty() || !report.warnings.is_empty() {
            tracing::warn!(
                errors = report.errors.len(),
                warnings = report.warnings.len(),
                "model rejected by the metamodel"
            );
            return Err(ModelError::InvalidModel {
                errors: report.errors,
                warnings: report.warnings,
            });
        }

        let sanitized = report.sanitized.unwrap_or(Value::Null);
        let schemas = SchemaSet::from_value(&sanitized)?;
        tracing::debug!(schemas = schemas.len(), "model constructed");
        Ok(Self { schemas, options })
    }

    /// Validate `value` against the schema named `schema_name`.
    ///
    /// `options` are layered over the model's construction options.
    pub fn validate(&self, value: &Value, schema_name: &str, options: &Options) -> Result<Outcome, ModelError> {
        let root = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| ModelError::UnknownSchema(schema_name.to_string()))?;
        let ctx = Context::new(value, &self.schemas, self.options.merge(options));
        let report = validator::validate(&ctx, value, &SchemaRef::Inline(Arc::clone(root)))?;
        tracing::debug!(
            schema = schema_name,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated value"
        );
        Ok(Outcome::from(report))
    }

    /// Validate against the schema named by the `default_schema` option
    /// (per-call options first, then construction options).
    pub fn validate_default(&self, value: &Value, options: &Options) -> Result<Outcome, ModelError> {
        let merged = self.options.merge(options);
        let name = merged.default_schema().ok_or(ModelError::NoDefaultSchema)?;
        self.validate(value, name, options)
    }

    /// Schema names in definition order.
    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.names()
    }

    /// A schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name).map(Arc::as_ref)
    }

    /// The construction options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The underlying schema set.
    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }
}
