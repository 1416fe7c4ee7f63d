//! Container primitives: `index`, `list`, `args`, `object`.
//!
//! Every child is validated even after a sibling fails, so a single call
//! reports all problems in the container.

use std::borrow::Cow;

use schemata_core::{Map, Value};

use crate::error::ModelError;
use crate::outcome::Node;
use crate::schema::{Fields, IndexMeta, ListMeta};
use crate::validator::Scope;

pub(super) fn index(node: &mut Node<'_>, meta: &IndexMeta, scope: &Scope<'_, '_>) -> Result<(), ModelError> {
    let value = node.value();
    let Some(entries) = value.keyed_entries() else {
        node.err("unable to coerce");
        return Ok(());
    };
    if matches!(value, Value::List(items) if !items.is_empty()) {
        node.warn("type coercion");
    }

    let mut sanitized = Map::with_capacity(entries.len());
    for (key, child) in entries.iter() {
        let report = scope.recurse(child, &meta.elements, key.as_str())?;
        if meta.valid_keys.as_ref().is_some_and(|p| !p.is_match(key)) {
            node.err(format!("invalid key: {key}"));
        }
        let child = node.absorb(report).unwrap_or(Value::Null);
        sanitized.insert(key.clone(), child);
    }
    node.set(sanitized);
    Ok(())
}

pub(super) fn list(node: &mut Node<'_>, meta: &ListMeta, scope: &Scope<'_, '_>) -> Result<(), ModelError> {
    let Some(items) = node.value().as_list() else {
        node.err("unable to coerce");
        return Ok(());
    };

    let mut sanitized = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let report = scope.recurse(item, &meta.elements, i)?;
        sanitized.push(node.absorb(report).unwrap_or(Value::Null));
    }
    node.set(sanitized);
    Ok(())
}

pub(super) fn args(node: &mut Node<'_>, fields: &Fields, scope: &Scope<'_, '_>) -> Result<(), ModelError> {
    declared_fields(node, fields, scope).map(|_| ())
}

pub(super) fn object(node: &mut Node<'_>, fields: &Fields, scope: &Scope<'_, '_>) -> Result<(), ModelError> {
    let Some(entries) = declared_fields(node, fields, scope)? else {
        return Ok(());
    };
    // Presence in the input counts, even when the field itself failed.
    for key in fields.keys() {
        if !entries.contains_key(key) {
            node.err(format!("missing field: {key}"));
        }
    }
    Ok(())
}

/// Shared body of `args` and `object`. Returns the input viewed as a
/// mapping, or `None` when the value is not a mapping or sequence.
fn declared_fields<'a>(
    node: &mut Node<'a>,
    fields: &Fields,
    scope: &Scope<'_, '_>,
) -> Result<Option<Cow<'a, Map>>, ModelError> {
    let Some(entries) = node.value().keyed_entries() else {
        node.err("unable to coerce");
        return Ok(None);
    };

    let mut sanitized = Map::with_capacity(entries.len());
    for (key, child) in entries.iter() {
        match fields.get(key) {
            Some(schema) => {
                let report = scope.recurse(child, schema, key.as_str())?;
                let child = node.absorb(report).unwrap_or(Value::Null);
                sanitized.insert(key.clone(), child);
            }
            None => node.warn(format!("extra key not in schema: {key}")),
        }
    }
    node.set(sanitized);
    Ok(Some(entries))
}
