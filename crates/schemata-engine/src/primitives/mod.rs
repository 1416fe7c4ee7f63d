//! # Primitive Handlers
//!
//! One handler per [`PrimitiveKind`](crate::schema::PrimitiveKind). Each
//! reads the node's value, records diagnostics and a sanitized value on the
//! [`Node`], and validates children through the [`Scope`]. Handlers that
//! never recurse cannot fail; the container handlers propagate depth
//! exhaustion from their children.

mod choice;
mod collection;
mod scalar;

use crate::error::ModelError;
use crate::outcome::Node;
use crate::schema::Schema;
use crate::validator::Scope;

/// Run the handler for `schema` on `node`.
pub(crate) fn apply(schema: &Schema, node: &mut Node<'_>, scope: &Scope<'_, '_>) -> Result<(), ModelError> {
    match schema {
        Schema::Freeform => scalar::freeform(node),
        Schema::Boolean => scalar::boolean(node),
        Schema::Regex => scalar::regex(node, scope.context().options()),
        Schema::Number(meta) => scalar::number(node, meta),
        Schema::String(meta) => scalar::string(node, meta, scope.context()),
        Schema::Index(meta) => return collection::index(node, meta, scope),
        Schema::List(meta) => return collection::list(node, meta, scope),
        Schema::Args(meta) => return collection::args(node, &meta.fields, scope),
        Schema::Object(meta) => return collection::object(node, &meta.fields, scope),
        Schema::Enum(meta) => return choice::enumeration(node, meta, scope),
        Schema::Multi(meta) => return choice::multi(node, meta, scope),
    }
    Ok(())
}
