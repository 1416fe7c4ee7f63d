//! Choice primitives: `enum` (discriminated union) and `multi` (first-best
//! match).

use schemata_core::{Map, Value};

use crate::error::ModelError;
use crate::outcome::{Node, Report};
use crate::schema::{EnumMeta, FieldsMeta, MultiMeta, Schema, SchemaRef};
use crate::validator::Scope;

pub(super) fn enumeration(node: &mut Node<'_>, meta: &EnumMeta, scope: &Scope<'_, '_>) -> Result<(), ModelError> {
    let Some(entries) = node.value().keyed_entries() else {
        node.err("unable to coerce");
        return Ok(());
    };
    let Some(discriminant) = entries.get(&meta.value_field) else {
        node.err(format!("missing value field: {}", meta.value_field));
        return Ok(());
    };
    let selected = discriminant
        .as_str()
        .and_then(|d| meta.options.get_key_value(d));
    let Some((name, fields)) = selected else {
        node.err(format!("value not allowed by enum: {discriminant}"));
        return Ok(());
    };

    let payload_fields = FieldsMeta {
        fields: fields.clone(),
    };
    let payload_schema = SchemaRef::inline(if meta.strict {
        Schema::Object(payload_fields)
    } else {
        Schema::Args(payload_fields)
    });
    let empty = Value::Map(Map::new());
    let payload = entries.get(&meta.meta_field).unwrap_or(&empty);

    let report = scope.recurse(payload, &payload_schema, meta.meta_field.as_str())?;
    let sanitized_payload = node.absorb(report).unwrap_or(Value::Null);

    let mut sanitized = Map::with_capacity(2);
    sanitized.insert(meta.value_field.clone(), Value::from(name.as_str()));
    sanitized.insert(meta.meta_field.clone(), sanitized_payload);
    node.set(sanitized);
    Ok(())
}

pub(super) fn multi(node: &mut Node<'_>, meta: &MultiMeta, scope: &Scope<'_, '_>) -> Result<(), ModelError> {
    // Stands unless a candidate validates cleanly.
    node.err("no options matched");

    let mut best: Option<Report> = None;
    for (i, candidate) in meta.allowed.iter().enumerate() {
        let report = scope.recurse(node.value(), candidate, format!("(multi: {i})"))?;
        node.merge(&report);
        let improves = best.as_ref().map_or(true, |b| {
            (report.errors.len(), report.warnings.len()) < (b.errors.len(), b.warnings.len())
        });
        if improves {
            best = Some(report);
        }
    }

    if let Some(winner) = best.filter(Report::is_ok) {
        node.proxy(winner);
    }
    Ok(())
}
