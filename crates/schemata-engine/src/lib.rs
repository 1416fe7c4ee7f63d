//! # schemata-engine — Validation and Sanitization
//!
//! Validates loosely-typed [`Value`](schemata_core::Value) trees against
//! declarative schemas, coerces them toward a canonical form, and reports
//! every violation and coercion with its path.
//!
//! ## Architecture
//!
//! ```text
//! Model::new(spec)
//!   └─ validator::validate(spec, metamodel["model"])   reject on any diagnostic
//!        └─ SchemaSet::from_value(sanitized)           typed schemas
//!
//! Model::validate(value, name, options)
//!   └─ validator::validate(value, schemas[name])
//!        └─ primitives::apply  ──recurse──▶  validator  ──▶ ...
//!   └─ Outcome { ok | errors }
//! ```
//!
//! ## Crate Policy
//!
//! - Invalid input never raises a Rust error. Only a rejected model, an
//!   unknown schema name, and depth exhaustion do.
//! - Primitives are a closed enum dispatched by one exhaustive `match`.
//! - Recursion depth is bounded by the `max_depth` option.
//! - No `unsafe`, no `.unwrap()` outside tests.

pub mod context;
pub mod error;
pub mod loader;
pub mod metamodel;
pub mod model;
pub mod outcome;
mod primitives;
pub mod schema;
pub mod validator;

pub use context::Context;
pub use error::{LoadError, ModelError};
pub use loader::{load_model, load_options, load_value};
pub use metamodel::{metamodel, metamodel_value};
pub use model::Model;
pub use outcome::{Diagnostic, Node, Outcome, Report};
pub use schema::{
    EnumMeta, Fields, FieldsMeta, IndexMeta, ListMeta, MultiMeta, NumberMeta, PrimitiveKind, Schema,
    SchemaRef, SchemaSet, StringMeta,
};
