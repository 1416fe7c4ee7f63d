//! # Recursive Validator
//!
//! [`validate`] walks a value and a schema together. Each node:
//!
//! 1. checks the depth limit (the depth of a node is its path length);
//! 2. swaps an opaque value for its representation;
//! 3. resolves the schema reference and dispatches on the primitive;
//! 4. withholds its sanitized value if any error was recorded.
//!
//! Handlers validate children only through [`Scope::recurse`], which
//! extends the path and re-enters step 1.

use schemata_core::{render_path, PathSegment, Value};

use crate::context::{Context, Resolved};
use crate::error::ModelError;
use crate::outcome::{Node, Report};
use crate::primitives;
use crate::schema::SchemaRef;

/// Validate `value` against `schema` from the root of `ctx`.
///
/// Errors only on depth exhaustion; every other failure is reported in the
/// returned [`Report`].
pub fn validate(ctx: &Context<'_>, value: &Value, schema: &SchemaRef) -> Result<Report, ModelError> {
    Scope { ctx, path: &[] }.subvalidate(value, schema)
}

/// A position in the walk: the shared context plus the path to the
/// current node.
pub struct Scope<'c, 'p> {
    ctx: &'c Context<'c>,
    path: &'p [PathSegment],
}

impl<'c, 'p> Scope<'c, 'p> {
    /// The validation context.
    pub fn context(&self) -> &'c Context<'c> {
        self.ctx
    }

    /// Path from the root to the current node.
    pub fn path(&self) -> &'p [PathSegment] {
        self.path
    }

    /// Validate a child of the current node under `key`.
    pub fn recurse(
        &self,
        value: &Value,
        schema: &SchemaRef,
        key: impl Into<PathSegment>,
    ) -> Result<Report, ModelError> {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(self.path);
        path.push(key.into());
        Scope {
            ctx: self.ctx,
            path: &path,
        }
        .subvalidate(value, schema)
    }

    fn subvalidate(&self, value: &Value, schema: &SchemaRef) -> Result<Report, ModelError> {
        let limit = self.ctx.options().max_depth();
        if self.path.len() > limit {
            let path = render_path(self.path);
            tracing::warn!(limit, path = %path, "validation depth limit exceeded");
            return Err(ModelError::DepthExceeded { limit, path });
        }

        let represented;
        let value = match value {
            Value::Opaque(inner) => {
                represented = inner.represent();
                &represented
            }
            other => other,
        };

        match self.ctx.resolve(schema) {
            Resolved::Schema(resolved) => {
                let mut node = Node::new(value, SchemaRef::Inline(resolved.clone()), self.path);
                primitives::apply(&resolved, &mut node, self)?;
                Ok(node.finish())
            }
            Resolved::Unknown(name) => {
                let mut node = Node::new(value, schema.clone(), self.path);
                node.err(format!("schema type not recognized: {name}"));
                Ok(node.finish())
            }
        }
    }
}
