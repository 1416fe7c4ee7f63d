//! # Validation Context
//!
//! Everything constant for the duration of one top-level validation call:
//! the root value (for `root_index` lookups), the schema set names resolve
//! against, and the fully merged option set.

use std::sync::Arc;

use schemata_core::{Options, Value};

use crate::schema::{PrimitiveKind, Schema, SchemaRef, SchemaSet};

/// Read-only state shared by every node of one validation call.
#[derive(Debug)]
pub struct Context<'a> {
    root: &'a Value,
    schemas: &'a SchemaSet,
    options: Options,
}

/// What a [`SchemaRef`] resolved to.
pub(crate) enum Resolved {
    /// A schema to dispatch on.
    Schema(Arc<Schema>),
    /// A name that is neither a schema in the set nor a primitive.
    Unknown(String),
}

impl<'a> Context<'a> {
    /// Build a context. `options` should already be merged over any
    /// defaults.
    pub fn new(root: &'a Value, schemas: &'a SchemaSet, options: Options) -> Self {
        Self {
            root,
            schemas,
            options,
        }
    }

    /// The value the top-level call was made with.
    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// The schema set names resolve against.
    pub fn schemas(&self) -> &'a SchemaSet {
        self.schemas
    }

    /// The effective options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Resolve a reference: inline schemas as-is, names through the schema
    /// set first and then as bare primitives with empty meta.
    pub(crate) fn resolve(&self, schema: &SchemaRef) -> Resolved {
        match schema {
            SchemaRef::Inline(inline) => Resolved::Schema(Arc::clone(inline)),
            SchemaRef::Named(name) => {
                if let Some(found) = self.schemas.get(name) {
                    Resolved::Schema(Arc::clone(found))
                } else if let Ok(kind) = name.parse::<PrimitiveKind>() {
                    Resolved::Schema(Arc::new(Schema::bare(kind)))
                } else {
                    Resolved::Unknown(name.clone())
                }
            }
        }
    }
}
