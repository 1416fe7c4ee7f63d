//! # Typed Schemas
//!
//! The schema language is data (`{type, meta}` mappings that may reference
//! each other by name), but the engine never interprets that data directly.
//! Once a model has passed the metamodel, its sanitized form is converted
//! into the closed [`Schema`] enum: one variant per primitive, each with a
//! typed meta struct. Dispatch is an exhaustive `match`, so a new primitive
//! cannot be added without every handler site noticing.
//!
//! [`SchemaRef`] is the "composite schema" of the language: either a name
//! resolved at validation time or an inline definition.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use schemata_core::{Map, Pattern, Value};

use crate::error::ModelError;

/// Field name → schema mapping used by `args`, `object`, and enum options.
pub type Fields = IndexMap<String, SchemaRef>;

/// Every primitive the engine implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Accepts anything unchanged.
    Freeform,
    /// Booleans, with `"true"`/`"false"` coercion.
    Boolean,
    /// Finite numbers with optional integer and range constraints.
    Number,
    /// Strings with length, pattern, root-index, and confidentiality options.
    String,
    /// Compiled regex literals.
    Regex,
    /// Homogeneous sequences.
    List,
    /// Homogeneous string-keyed mappings.
    Index,
    /// Mappings with declared, optional fields.
    Args,
    /// Mappings with declared, required fields.
    Object,
    /// Discriminated unions.
    Enum,
    /// First-best match among candidate schemas.
    Multi,
}

impl PrimitiveKind {
    /// All primitives in registry order.
    pub fn all() -> &'static [PrimitiveKind] {
        &[
            Self::Freeform,
            Self::Boolean,
            Self::Number,
            Self::String,
            Self::Regex,
            Self::List,
            Self::Index,
            Self::Args,
            Self::Object,
            Self::Enum,
            Self::Multi,
        ]
    }

    /// The total number of primitives.
    pub const COUNT: usize = 11;

    /// The name used for this primitive in the schema language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Freeform => "freeform",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Regex => "regex",
            Self::List => "list",
            Self::Index => "index",
            Self::Args => "args",
            Self::Object => "object",
            Self::Enum => "enum",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownPrimitive(s.to_string()))
    }
}

/// Meta options of the `number` primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberMeta {
    /// Reject values with a fractional part.
    pub integer: bool,
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
}

/// Meta options of the `string` primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringMeta {
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Pattern the string must match somewhere.
    pub regex: Option<Pattern>,
    /// The string must be a key of the root value.
    pub root_index: bool,
    /// Redact the output when `hide_confidential` is set.
    pub confidential: bool,
}

/// Meta options of the `index` primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMeta {
    /// Schema of every entry.
    pub elements: SchemaRef,
    /// Pattern every key must match.
    pub valid_keys: Option<Pattern>,
}

impl Default for IndexMeta {
    fn default() -> Self {
        Self {
            elements: SchemaRef::default_elements(),
            valid_keys: None,
        }
    }
}

/// Meta options of the `list` primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ListMeta {
    /// Schema of every item.
    pub elements: SchemaRef,
}

impl Default for ListMeta {
    fn default() -> Self {
        Self {
            elements: SchemaRef::default_elements(),
        }
    }
}

/// Meta options of the `args` and `object` primitives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldsMeta {
    /// Declared fields.
    pub fields: Fields,
}

/// Meta options of the `enum` primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMeta {
    /// Key holding the discriminant.
    pub value_field: String,
    /// Key holding the payload validated against the selected option.
    pub meta_field: String,
    /// Validate payloads as `object` (true) or `args` (false).
    pub strict: bool,
    /// Discriminant → payload fields.
    pub options: IndexMap<String, Fields>,
}

impl Default for EnumMeta {
    fn default() -> Self {
        Self {
            value_field: "value".to_string(),
            meta_field: "meta".to_string(),
            strict: true,
            options: IndexMap::new(),
        }
    }
}

/// Meta options of the `multi` primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiMeta {
    /// Candidate schemas, in preference order for ties.
    pub allowed: Vec<SchemaRef>,
}

/// A schema: one primitive plus its meta options.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Freeform,
    Boolean,
    Regex,
    Number(NumberMeta),
    String(StringMeta),
    Index(IndexMeta),
    List(ListMeta),
    Args(FieldsMeta),
    Object(FieldsMeta),
    Enum(EnumMeta),
    Multi(MultiMeta),
}

impl Schema {
    /// The schema a bare primitive name stands for: that primitive with
    /// empty meta.
    pub fn bare(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Freeform => Self::Freeform,
            PrimitiveKind::Boolean => Self::Boolean,
            PrimitiveKind::Regex => Self::Regex,
            PrimitiveKind::Number => Self::Number(NumberMeta::default()),
            PrimitiveKind::String => Self::String(StringMeta::default()),
            PrimitiveKind::Index => Self::Index(IndexMeta::default()),
            PrimitiveKind::List => Self::List(ListMeta::default()),
            PrimitiveKind::Args => Self::Args(FieldsMeta::default()),
            PrimitiveKind::Object => Self::Object(FieldsMeta::default()),
            PrimitiveKind::Enum => Self::Enum(EnumMeta::default()),
            PrimitiveKind::Multi => Self::Multi(MultiMeta::default()),
        }
    }

    /// Which primitive this schema uses.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Freeform => PrimitiveKind::Freeform,
            Self::Boolean => PrimitiveKind::Boolean,
            Self::Regex => PrimitiveKind::Regex,
            Self::Number(_) => PrimitiveKind::Number,
            Self::String(_) => PrimitiveKind::String,
            Self::Index(_) => PrimitiveKind::Index,
            Self::List(_) => PrimitiveKind::List,
            Self::Args(_) => PrimitiveKind::Args,
            Self::Object(_) => PrimitiveKind::Object,
            Self::Enum(_) => PrimitiveKind::Enum,
            Self::Multi(_) => PrimitiveKind::Multi,
        }
    }

    /// Render in the schema language's `{type, meta}` form.
    ///
    /// Unset options are omitted; `enum` always renders all four of its
    /// options because its defaults are not the empty value.
    pub fn to_value(&self) -> Value {
        let mut meta = Map::new();
        match self {
            Self::Freeform | Self::Boolean | Self::Regex => {}
            Self::Number(m) => {
                if m.integer {
                    meta.insert("integer".into(), Value::Bool(true));
                }
                if let Some(min) = m.min {
                    meta.insert("min".into(), Value::Number(min));
                }
                if let Some(max) = m.max {
                    meta.insert("max".into(), Value::Number(max));
                }
            }
            Self::String(m) => {
                if let Some(n) = m.max_length {
                    meta.insert("max_length".into(), Value::from(n));
                }
                if let Some(n) = m.min_length {
                    meta.insert("min_length".into(), Value::from(n));
                }
                if let Some(p) = &m.regex {
                    meta.insert("regex".into(), Value::Regex(p.clone()));
                }
                if m.root_index {
                    meta.insert("root_index".into(), Value::Bool(true));
                }
                if m.confidential {
                    meta.insert("confidential".into(), Value::Bool(true));
                }
            }
            Self::Index(m) => {
                meta.insert("elements".into(), m.elements.to_value());
                if let Some(p) = &m.valid_keys {
                    meta.insert("valid_keys".into(), Value::Regex(p.clone()));
                }
            }
            Self::List(m) => {
                meta.insert("elements".into(), m.elements.to_value());
            }
            Self::Args(m) | Self::Object(m) => {
                meta.insert("fields".into(), fields_to_value(&m.fields));
            }
            Self::Enum(m) => {
                meta.insert("value_field".into(), Value::from(m.value_field.as_str()));
                meta.insert("meta_field".into(), Value::from(m.meta_field.as_str()));
                meta.insert("strict".into(), Value::Bool(m.strict));
                let options = m
                    .options
                    .iter()
                    .map(|(k, fields)| (k.clone(), fields_to_value(fields)))
                    .collect();
                meta.insert("options".into(), options);
            }
            Self::Multi(m) => {
                let allowed = m.allowed.iter().map(SchemaRef::to_value).collect();
                meta.insert("allowed".into(), allowed);
            }
        }
        let mut out = Map::new();
        out.insert("type".into(), Value::from(self.kind().as_str()));
        out.insert("meta".into(), Value::Map(meta));
        Value::Map(out)
    }

    /// Build a schema from its `{type, meta}` form.
    ///
    /// This is the second half of model construction: the input is the
    /// sanitized output of the metamodel, so every shape error here means
    /// the value skipped metamodel validation. Unknown meta keys are
    /// ignored; the metamodel already reports them.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let map = value
            .as_map()
            .ok_or_else(|| malformed(format!("schema must be a mapping, got {}", value.type_name())))?;
        let type_name = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("schema is missing a string 'type'"))?;
        let kind: PrimitiveKind = type_name.parse()?;
        let empty = Map::new();
        let meta = match map.get("meta") {
            None | Some(Value::Null) => &empty,
            Some(Value::Map(m)) => m,
            Some(other) => {
                return Err(malformed(format!(
                    "meta of a {kind} schema must be a mapping, got {}",
                    other.type_name()
                )))
            }
        };
        let schema = match kind {
            PrimitiveKind::Freeform => Self::Freeform,
            PrimitiveKind::Boolean => Self::Boolean,
            PrimitiveKind::Regex => Self::Regex,
            PrimitiveKind::Number => Self::Number(NumberMeta {
                integer: opt_bool(meta, "integer")?.unwrap_or(false),
                min: opt_number(meta, "min")?,
                max: opt_number(meta, "max")?,
            }),
            PrimitiveKind::String => Self::String(StringMeta {
                max_length: opt_natural(meta, "max_length")?,
                min_length: opt_natural(meta, "min_length")?,
                regex: opt_pattern(meta, "regex")?,
                root_index: opt_bool(meta, "root_index")?.unwrap_or(false),
                confidential: opt_bool(meta, "confidential")?.unwrap_or(false),
            }),
            PrimitiveKind::Index => Self::Index(IndexMeta {
                elements: opt_ref(meta, "elements")?.unwrap_or_else(SchemaRef::default_elements),
                valid_keys: opt_pattern(meta, "valid_keys")?,
            }),
            PrimitiveKind::List => Self::List(ListMeta {
                elements: opt_ref(meta, "elements")?.unwrap_or_else(SchemaRef::default_elements),
            }),
            PrimitiveKind::Args => Self::Args(FieldsMeta {
                fields: opt_fields(meta, "fields")?.unwrap_or_default(),
            }),
            PrimitiveKind::Object => Self::Object(FieldsMeta {
                fields: opt_fields(meta, "fields")?.unwrap_or_default(),
            }),
            PrimitiveKind::Enum => {
                let defaults = EnumMeta::default();
                let options = match meta.get("options") {
                    None => IndexMap::new(),
                    Some(Value::Map(opts)) => opts
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), fields_from_value(v)?)))
                        .collect::<Result<_, ModelError>>()?,
                    Some(other) => {
                        return Err(malformed(format!(
                            "enum options must be a mapping, got {}",
                            other.type_name()
                        )))
                    }
                };
                Self::Enum(EnumMeta {
                    value_field: opt_string(meta, "value_field")?.unwrap_or(defaults.value_field),
                    meta_field: opt_string(meta, "meta_field")?.unwrap_or(defaults.meta_field),
                    strict: opt_bool(meta, "strict")?.unwrap_or(defaults.strict),
                    options,
                })
            }
            PrimitiveKind::Multi => {
                let allowed = match meta.get("allowed") {
                    None => Vec::new(),
                    Some(Value::List(items)) => items
                        .iter()
                        .map(SchemaRef::from_value)
                        .collect::<Result<_, _>>()?,
                    Some(other) => {
                        return Err(malformed(format!(
                            "multi allowed must be a list, got {}",
                            other.type_name()
                        )))
                    }
                };
                Self::Multi(MultiMeta { allowed })
            }
        };
        Ok(schema)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// A schema given by name or inline.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaRef {
    /// Resolved at validation time: a model entry, else a bare primitive.
    Named(String),
    /// An inline definition.
    Inline(Arc<Schema>),
}

impl SchemaRef {
    /// Reference a schema by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap an inline schema.
    pub fn inline(schema: Schema) -> Self {
        Self::Inline(Arc::new(schema))
    }

    /// `"object"`, the element schema of `index` and `list` when none is given.
    pub fn default_elements() -> Self {
        Self::named(PrimitiveKind::Object.as_str())
    }

    /// Render as a bare name or a `{type, meta}` mapping.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Named(name) => Value::from(name.as_str()),
            Self::Inline(schema) => schema.to_value(),
        }
    }

    /// Parse a bare name or a `{type, meta}` mapping.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(name) => Ok(Self::Named(name.clone())),
            Value::Map(_) => Ok(Self::inline(Schema::from_value(value)?)),
            other => Err(malformed(format!(
                "schema reference must be a name or a mapping, got {}",
                other.type_name()
            ))),
        }
    }
}

impl From<Schema> for SchemaRef {
    fn from(schema: Schema) -> Self {
        Self::inline(schema)
    }
}

impl From<&str> for SchemaRef {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl Serialize for SchemaRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// A named collection of schemas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a schema.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), Arc::new(schema));
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Whether `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Schema names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Render as a mapping of name → `{type, meta}`.
    pub fn to_value(&self) -> Value {
        self.schemas
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_value()))
            .collect()
    }

    /// Build from a mapping of name → `{type, meta}`.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let map = value
            .as_map()
            .ok_or_else(|| malformed(format!("model must be a mapping, got {}", value.type_name())))?;
        let mut set = Self::new();
        for (name, schema) in map {
            let schema = Schema::from_value(schema)
                .map_err(|e| malformed(format!("schema '{name}': {e}")))?;
            set.insert(name.clone(), schema);
        }
        Ok(set)
    }
}

// ---------------------------------------------------------------------------
// Meta parsing helpers
// ---------------------------------------------------------------------------

fn malformed(reason: impl Into<String>) -> ModelError {
    ModelError::MalformedSchema(reason.into())
}

fn fields_to_value(fields: &Fields) -> Value {
    fields
        .iter()
        .map(|(k, r)| (k.clone(), r.to_value()))
        .collect()
}

fn fields_from_value(value: &Value) -> Result<Fields, ModelError> {
    let map = value
        .as_map()
        .ok_or_else(|| malformed(format!("fields must be a mapping, got {}", value.type_name())))?;
    map.iter()
        .map(|(k, v)| Ok((k.clone(), SchemaRef::from_value(v)?)))
        .collect()
}

fn opt_fields(meta: &Map, key: &str) -> Result<Option<Fields>, ModelError> {
    meta.get(key).map(fields_from_value).transpose()
}

fn opt_ref(meta: &Map, key: &str) -> Result<Option<SchemaRef>, ModelError> {
    meta.get(key).map(SchemaRef::from_value).transpose()
}

fn opt_bool(meta: &Map, key: &str) -> Result<Option<bool>, ModelError> {
    match meta.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(malformed(format!("'{key}' must be a boolean, got {}", other.type_name()))),
    }
}

fn opt_number(meta: &Map, key: &str) -> Result<Option<f64>, ModelError> {
    match meta.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) if n.is_finite() => Ok(Some(*n)),
        Some(other) => Err(malformed(format!("'{key}' must be a finite number, got {other}"))),
    }
}

fn opt_natural(meta: &Map, key: &str) -> Result<Option<usize>, ModelError> {
    match meta.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
            Ok(Some(*n as usize))
        }
        Some(other) => Err(malformed(format!("'{key}' must be a natural number, got {other}"))),
    }
}

fn opt_string(meta: &Map, key: &str) -> Result<Option<String>, ModelError> {
    match meta.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(malformed(format!("'{key}' must be a string, got {}", other.type_name()))),
    }
}

fn opt_pattern(meta: &Map, key: &str) -> Result<Option<Pattern>, ModelError> {
    match meta.get(key) {
        None => Ok(None),
        Some(Value::Regex(p)) => Ok(Some(p.clone())),
        Some(Value::String(literal)) => Pattern::parse(literal)
            .map(Some)
            .map_err(|e| malformed(format!("'{key}': {e}"))),
        Some(other) => Err(malformed(format!("'{key}' must be a regex, got {}", other.type_name()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn test_primitive_count() {
        assert_eq!(PrimitiveKind::all().len(), PrimitiveKind::COUNT);
    }

    #[test]
    fn test_primitive_names_roundtrip() {
        for kind in PrimitiveKind::all() {
            let parsed: PrimitiveKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
            assert_eq!(Schema::bare(*kind).kind(), *kind);
        }
        assert!("Number".parse::<PrimitiveKind>().is_err());
        assert!("".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn test_from_value_number() {
        let schema = Schema::from_value(&json(serde_json::json!({
            "type": "number",
            "meta": {"integer": true, "min": 0, "max": 10}
        })))
        .unwrap();
        assert_eq!(
            schema,
            Schema::Number(NumberMeta {
                integer: true,
                min: Some(0.0),
                max: Some(10.0)
            })
        );
    }

    #[test]
    fn test_from_value_missing_meta_is_empty() {
        let schema = Schema::from_value(&json(serde_json::json!({"type": "list"}))).unwrap();
        assert_eq!(schema, Schema::List(ListMeta::default()));
    }

    #[test]
    fn test_from_value_string_regex_literal() {
        let schema = Schema::from_value(&json(serde_json::json!({
            "type": "string",
            "meta": {"regex": "/^[a-z]+$/i", "confidential": true}
        })))
        .unwrap();
        let Schema::String(meta) = schema else {
            panic!("expected a string schema");
        };
        assert!(meta.confidential);
        assert_eq!(meta.regex.unwrap().to_string(), "/^[a-z]+$/i");
    }

    #[test]
    fn test_from_value_enum_defaults() {
        let schema = Schema::from_value(&json(serde_json::json!({
            "type": "enum",
            "meta": {"options": {"x": {}, "y": {"n": "number"}}}
        })))
        .unwrap();
        let Schema::Enum(meta) = schema else {
            panic!("expected an enum schema");
        };
        assert_eq!(meta.value_field, "value");
        assert_eq!(meta.meta_field, "meta");
        assert!(meta.strict);
        assert_eq!(meta.options["y"]["n"], SchemaRef::named("number"));
    }

    #[test]
    fn test_from_value_rejects_unknown_type() {
        let err = Schema::from_value(&json(serde_json::json!({"type": "bogus"}))).unwrap_err();
        assert!(matches!(err, ModelError::UnknownPrimitive(ref name) if name == "bogus"));
    }

    #[test]
    fn test_from_value_rejects_bad_meta_shape() {
        let err = Schema::from_value(&json(serde_json::json!({
            "type": "string",
            "meta": {"max_length": -1}
        })))
        .unwrap_err();
        assert!(matches!(err, ModelError::MalformedSchema(_)));
    }

    #[test]
    fn test_to_value_then_from_value_is_identity() {
        let schema = Schema::Multi(MultiMeta {
            allowed: vec![
                SchemaRef::named("number"),
                SchemaRef::inline(Schema::Index(IndexMeta {
                    elements: SchemaRef::named("string"),
                    valid_keys: Some(Pattern::parse("/^k/").unwrap()),
                })),
            ],
        });
        assert_eq!(Schema::from_value(&schema.to_value()).unwrap(), schema);
    }

    #[test]
    fn test_schema_set_from_value_names_bad_entry() {
        let err = SchemaSet::from_value(&json(serde_json::json!({
            "good": {"type": "boolean"},
            "bad": {"type": "list", "meta": {"elements": 7}}
        })))
        .unwrap_err();
        assert!(err.to_string().contains("'bad'"), "{err}");
    }

    #[test]
    fn test_serialize_named_and_inline() {
        let named = serde_json::to_string(&SchemaRef::named("person")).unwrap();
        assert_eq!(named, r#""person""#);
        let inline = serde_json::to_string(&SchemaRef::inline(Schema::Boolean)).unwrap();
        assert_eq!(inline, r#"{"type":"boolean","meta":{}}"#);
    }
}
