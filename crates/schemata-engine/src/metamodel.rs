//! # Metamodel
//!
//! The schema set every model is validated against before it is trusted.
//! It is written in the schema language itself:
//!
//! | name | definition |
//! |---|---|
//! | `model` | index of `schema`; every key except the bare word `type` |
//! | `primitive string` | string naming a primitive |
//! | `composite schema` | multi of `schema`, `primitive string`, or a root-index string |
//! | `natural number` | integer ≥ 0 |
//! | `object fields` | index of `composite schema` |
//! | `schema` | non-strict enum on `type`/`meta`, one option per primitive |
//!
//! The root-index branch of `composite schema` is what lets a model refer
//! to its own entries by name: during model validation the root value is
//! the model, so a string is accepted exactly when it names one of them.
//!
//! The set is built once on first use and shared for the life of the
//! process.

use std::sync::OnceLock;

use schemata_core::{Pattern, PatternError, Value};

use crate::error::ModelError;
use crate::schema::{
    EnumMeta, Fields, IndexMeta, ListMeta, MultiMeta, NumberMeta, PrimitiveKind, Schema, SchemaRef,
    SchemaSet, StringMeta,
};

/// Name of the metamodel entry a whole model is validated against.
pub const MODEL_SCHEMA: &str = "model";

/// Any non-empty key other than exactly `type`. Written without
/// look-around, which the regex engine does not support.
const MODEL_KEY_PATTERN: &str = "^(?:[^t]|t[^y]|ty[^p]|typ[^e]|type.|t$|ty$|typ$)";

static METAMODEL: OnceLock<Option<SchemaSet>> = OnceLock::new();

/// The metamodel as typed schemas.
pub fn metamodel() -> Result<&'static SchemaSet, ModelError> {
    METAMODEL
        .get_or_init(|| match build() {
            Ok(set) => Some(set),
            Err(e) => {
                tracing::error!(error = %e, "failed to build the metamodel");
                None
            }
        })
        .as_ref()
        .ok_or(ModelError::MetamodelUnavailable)
}

/// The metamodel in its schema-language form.
pub fn metamodel_value() -> Result<Value, ModelError> {
    Ok(metamodel()?.to_value())
}

fn named(name: &str) -> SchemaRef {
    SchemaRef::named(name)
}

fn build() -> Result<SchemaSet, PatternError> {
    let primitive_names: Vec<&str> = PrimitiveKind::all().iter().map(PrimitiveKind::as_str).collect();
    let primitive_pattern = Pattern::new(&format!("^({})$", primitive_names.join("|")), "")?;

    let mut set = SchemaSet::new();
    set.insert(
        MODEL_SCHEMA,
        Schema::Index(IndexMeta {
            elements: named("schema"),
            valid_keys: Some(Pattern::new(MODEL_KEY_PATTERN, "")?),
        }),
    );
    set.insert(
        "primitive string",
        Schema::String(StringMeta {
            regex: Some(primitive_pattern),
            ..StringMeta::default()
        }),
    );
    set.insert(
        "composite schema",
        Schema::Multi(MultiMeta {
            allowed: vec![
                named("schema"),
                named("primitive string"),
                SchemaRef::inline(Schema::String(StringMeta {
                    root_index: true,
                    ..StringMeta::default()
                })),
            ],
        }),
    );
    set.insert(
        "natural number",
        Schema::Number(NumberMeta {
            integer: true,
            min: Some(0.0),
            max: None,
        }),
    );
    set.insert(
        "object fields",
        Schema::Index(IndexMeta {
            elements: named("composite schema"),
            valid_keys: None,
        }),
    );
    set.insert(
        "schema",
        Schema::Enum(EnumMeta {
            value_field: "type".to_string(),
            meta_field: "meta".to_string(),
            strict: false,
            options: PrimitiveKind::all()
                .iter()
                .map(|kind| (kind.as_str().to_string(), meta_fields(*kind)))
                .collect(),
        }),
    );
    Ok(set)
}

/// The meta options each primitive accepts.
fn meta_fields(kind: PrimitiveKind) -> Fields {
    let fields: Vec<(&str, SchemaRef)> = match kind {
        PrimitiveKind::Freeform | PrimitiveKind::Boolean | PrimitiveKind::Regex => Vec::new(),
        PrimitiveKind::Number => vec![
            ("integer", named("boolean")),
            ("max", named("number")),
            ("min", named("number")),
        ],
        PrimitiveKind::String => vec![
            ("max_length", named("natural number")),
            ("min_length", named("natural number")),
            ("regex", named("regex")),
            ("root_index", named("boolean")),
            ("confidential", named("boolean")),
        ],
        PrimitiveKind::Enum => vec![
            ("value_field", named("string")),
            ("meta_field", named("string")),
            ("strict", named("boolean")),
            (
                "options",
                SchemaRef::inline(Schema::Index(IndexMeta {
                    elements: named("object fields"),
                    valid_keys: None,
                })),
            ),
        ],
        PrimitiveKind::Index => vec![
            ("elements", named("composite schema")),
            ("valid_keys", named("regex")),
        ],
        PrimitiveKind::List => vec![("elements", named("composite schema"))],
        PrimitiveKind::Args | PrimitiveKind::Object => vec![("fields", named("object fields"))],
        PrimitiveKind::Multi => vec![(
            "allowed",
            SchemaRef::inline(Schema::List(ListMeta {
                elements: named("composite schema"),
            })),
        )],
    };
    fields
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::outcome::Outcome;
    use crate::validator::validate;
    use schemata_core::Options;

    fn against_metamodel(value: &Value) -> Outcome {
        let set = metamodel().unwrap();
        let ctx = Context::new(value, set, Options::new());
        Outcome::from(validate(&ctx, value, &SchemaRef::named(MODEL_SCHEMA)).unwrap())
    }

    #[test]
    fn test_metamodel_builds() {
        let set = metamodel().unwrap();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(
            names,
            [
                "model",
                "primitive string",
                "composite schema",
                "natural number",
                "object fields",
                "schema"
            ]
        );
    }

    #[test]
    fn test_every_primitive_has_a_schema_option() {
        let set = metamodel().unwrap();
        let Some(Schema::Enum(meta)) = set.get("schema").map(|s| s.as_ref()) else {
            panic!("'schema' must be an enum");
        };
        assert_eq!(meta.options.len(), PrimitiveKind::COUNT);
        for kind in PrimitiveKind::all() {
            assert!(meta.options.contains_key(kind.as_str()), "no option for {kind}");
        }
    }

    #[test]
    fn test_metamodel_describes_itself() {
        let value = metamodel_value().unwrap();
        let outcome = against_metamodel(&value);
        assert!(outcome.is_ok(), "{:?}", outcome.error_messages());
        assert!(outcome.warnings().is_empty(), "{:?}", outcome.warning_messages());
    }

    #[test]
    fn test_self_validation_is_a_fixed_point() {
        let value = metamodel_value().unwrap();
        let outcome = against_metamodel(&value);
        let rebuilt = SchemaSet::from_value(outcome.sanitized().unwrap()).unwrap();
        assert_eq!(&rebuilt, metamodel().unwrap());
    }

    #[test]
    fn test_model_key_pattern() {
        let pattern = Pattern::new(MODEL_KEY_PATTERN, "").unwrap();
        for ok in ["person", "t", "ty", "typ", "types", "typo", "xtype", "my type"] {
            assert!(pattern.is_match(ok), "{ok:?} should be accepted");
        }
        for bad in ["type", ""] {
            assert!(!pattern.is_match(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_unregistered_primitive() {
        let model = Value::from(serde_json::json!({"thing": {"type": "bogus"}}));
        let outcome = against_metamodel(&model);
        assert_eq!(outcome.error_messages(), ["value not allowed by enum: bogus"]);
    }

    #[test]
    fn test_rejects_key_named_type() {
        let model = Value::from(serde_json::json!({"type": {"type": "boolean"}}));
        let outcome = against_metamodel(&model);
        assert_eq!(outcome.error_messages(), ["invalid key: type"]);
    }

    #[test]
    fn test_references_must_name_a_schema_or_primitive() {
        let model = Value::from(serde_json::json!({
            "pair": {"type": "list", "meta": {"elements": "point"}},
            "point": {"type": "object", "meta": {"fields": {"x": "number", "y": "nowhere"}}}
        }));
        let outcome = against_metamodel(&model);
        assert!(!outcome.is_ok());
        assert!(outcome
            .errors()
            .iter()
            .all(|d| d.path.iter().any(|s| s.to_string() == "y")));
    }
}
