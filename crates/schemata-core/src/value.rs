//! # Value Model
//!
//! [`Value`] is the loosely-typed tree every validation consumes and every
//! sanitization produces. It is deliberately wider than JSON:
//!
//! - numbers are `f64` (non-finite values can be constructed in code and are
//!   rejected by the `number` primitive);
//! - [`Value::Regex`] holds a compiled [`Pattern`], the sanitized form of a
//!   `/pattern/flags` literal;
//! - [`Value::Opaque`] carries a host object exposing the [`Represent`]
//!   capability, which the validator swaps for its representation before
//!   checking it.
//!
//! Mappings preserve insertion order, so a sequence coerced into a mapping
//! keeps its positional order (`"0"`, `"1"`, ..., `"10"`).
//!
//! ## Serialization
//!
//! `Value` implements `Serialize` and `Deserialize`. Integral numbers inside
//! the exactly-representable `f64` range serialize as integers, patterns
//! serialize as their literal, and opaque values serialize through their
//! representation.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::pattern::Pattern;

/// Insertion-ordered mapping with unique string keys.
pub type Map = IndexMap<String, Value>;

/// Largest magnitude below which every integer is exactly representable as
/// an `f64` (2^53).
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// The capability of producing an alternate representation for validation.
///
/// Host types that should be validated by their "wire" form rather than
/// their in-memory form implement this and are wrapped in
/// [`Value::Opaque`]. The validator calls [`Represent::represent`] once per
/// node and validates the returned value in its place.
pub trait Represent: fmt::Debug + Send + Sync {
    /// Produce the value to validate instead of `self`.
    fn represent(&self) -> Value;
}

/// A loosely-typed, nested value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null or absent.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A compiled regex literal.
    Regex(Pattern),
    /// An ordered sequence.
    List(Vec<Value>),
    /// An insertion-ordered mapping.
    Map(Map),
    /// A host object validated through its representation.
    Opaque(Arc<dyn Represent>),
}

impl Value {
    /// Wrap a [`Represent`] implementor.
    pub fn opaque<R: Represent + 'static>(inner: R) -> Self {
        Self::Opaque(Arc::new(inner))
    }

    /// Short lowercase name of the variant, used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Regex(_) => "regex",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The pattern, if this is a compiled regex.
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Self::Regex(p) => Some(p),
            _ => None,
        }
    }

    /// The sequence, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The mapping, if this is a map.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` in a mapping. Returns `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Whether `key` addresses an entry of this value: a key of a mapping,
    /// or the canonical decimal position of a list item (`"0"`, not `"00"`).
    pub fn has_key(&self, key: &str) -> bool {
        match self {
            Self::Map(map) => map.contains_key(key),
            Self::List(items) => key
                .parse::<usize>()
                .is_ok_and(|i| i < items.len() && i.to_string() == key),
            _ => false,
        }
    }

    /// View a mapping, or a list keyed by position, as a mapping.
    ///
    /// Returns `None` for every other variant. Lists are copied into a new
    /// mapping with keys `"0"`, `"1"`, ... in order.
    pub fn keyed_entries(&self) -> Option<std::borrow::Cow<'_, Map>> {
        match self {
            Self::Map(map) => Some(std::borrow::Cow::Borrowed(map)),
            Self::List(items) => Some(std::borrow::Cow::Owned(list_to_map(items))),
            _ => None,
        }
    }
}

/// Convert a sequence into a mapping keyed by decimal position.
pub fn list_to_map(items: &[Value]) -> Map {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v.clone()))
        .collect()
}

/// Render a number the way the schema language expects: integral values
/// without a fractional part, everything else in shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => {
                std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// Strings and scalars render bare; containers render as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => f.write_str(s),
            Self::Regex(p) => write!(f, "{p}"),
            Self::List(_) | Self::Map(_) | Self::Opaque(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Self::Regex(p)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().collect())
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            // serde_json numbers are always finite, so as_f64 never misses.
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => items.into_iter().map(Self::from).collect(),
            serde_json::Value::Object(map) => {
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < EXACT_INTEGER_LIMIT {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Regex(p) => p.serialize(serializer),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Self::Opaque(inner) => inner.represent().serialize(serializer),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON-compatible value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::from(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        Ok(Value::from(n))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Number(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// JSON-compatible values with integral numbers, so the integer
    /// serialization path is exercised.
    fn json_like_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-1_000_000i64..1_000_000).prop_map(Value::from),
            "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
                prop::collection::vec(("[a-z]{1,8}", inner), 0..8)
                    .prop_map(|pairs| pairs.into_iter().collect::<Value>()),
            ]
        })
    }

    /// Key sequences of every mapping in the tree, depth first.
    fn key_orders(value: &Value, out: &mut Vec<Vec<String>>) {
        match value {
            Value::Map(map) => {
                out.push(map.keys().cloned().collect());
                map.values().for_each(|v| key_orders(v, out));
            }
            Value::List(items) => items.iter().for_each(|v| key_orders(v, out)),
            _ => {}
        }
    }

    proptest! {
        /// Serializing to JSON and reading back yields an equal value,
        /// including mapping key order.
        #[test]
        fn json_text_preserves_value(value in json_like_value()) {
            let text = serde_json::to_string(&value).unwrap();
            let back: Value = serde_json::from_str(&text).unwrap();
            let (mut expected, mut actual) = (Vec::new(), Vec::new());
            key_orders(&value, &mut expected);
            key_orders(&back, &mut actual);
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(back, value);
        }

        /// Going through `serde_json::Value` keeps key order too.
        #[test]
        fn json_value_conversion_preserves_key_order(value in json_like_value()) {
            let json = serde_json::to_value(&value).unwrap();
            let back = Value::from(json);
            let (mut expected, mut actual) = (Vec::new(), Vec::new());
            key_orders(&value, &mut expected);
            key_orders(&back, &mut actual);
            prop_assert_eq!(actual, expected);
        }
    }
}
