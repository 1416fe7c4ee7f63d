//! Leaf primitives: `freeform`, `boolean`, `number`, `string`, `regex`.

use schemata_core::{format_number, Options, Pattern, Value, CONFIDENTIAL_PLACEHOLDER};

use crate::context::Context;
use crate::outcome::Node;
use crate::schema::{NumberMeta, StringMeta};

pub(super) fn freeform(node: &mut Node<'_>) {
    node.set(node.value().clone());
}

pub(super) fn boolean(node: &mut Node<'_>) {
    match node.value() {
        Value::Bool(b) => node.set(*b),
        Value::String(s) if s == "true" || s == "false" => {
            node.warn("type coercion");
            node.set(s == "true");
        }
        _ => node.err("unable to coerce"),
    }
}

pub(super) fn number(node: &mut Node<'_>, meta: &NumberMeta) {
    let value = node.value();
    if !matches!(value, Value::Number(_)) {
        node.warn("type coercion");
    }
    let Some(n) = coerce_number(value) else {
        node.err("unable to coerce");
        return;
    };
    if meta.integer && n.fract() != 0.0 {
        node.err("not an integer");
    }
    if meta.min.is_some_and(|min| n < min) {
        node.err("minimum violated");
    }
    if meta.max.is_some_and(|max| n > max) {
        node.err("maximum violated");
    }
    node.set(n);
}

/// Cast to a finite `f64`. Strings are trimmed and may carry a `0x`, `0o`,
/// or `0b` prefix; every other non-number is uncastable.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => *n,
        Value::String(s) => parse_number(s.trim())?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in prefixed {
        if let Some(digits) = text.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }
    // Reject the spellings Rust accepts but the schema language does not.
    if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f64>().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

pub(super) fn string(node: &mut Node<'_>, meta: &StringMeta, ctx: &Context<'_>) {
    let text = match node.value() {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            node.warn("type coercion");
            format_number(*n).to_lowercase()
        }
        Value::Bool(b) => {
            node.warn("type coercion");
            b.to_string()
        }
        _ => {
            node.err("unable to coerce");
            return;
        }
    };

    let length = text.chars().count();
    if meta.max_length.is_some_and(|max| length > max) {
        node.err("max length violated");
    }
    if meta.min_length.is_some_and(|min| length < min) {
        node.err("min length violated");
    }
    if meta.root_index && !ctx.root().has_key(&text) {
        node.err("not a valid key into the root index");
    }
    if meta.regex.as_ref().is_some_and(|p| !p.is_match(&text)) {
        node.err("regex violated");
    }

    if meta.confidential && ctx.options().hide_confidential() {
        node.set(CONFIDENTIAL_PLACEHOLDER);
    } else {
        node.set(text);
    }
}

pub(super) fn regex(node: &mut Node<'_>, options: &Options) {
    let pattern = match node.value() {
        Value::Regex(p) => p.clone(),
        Value::String(literal) => match Pattern::parse(literal) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(literal = %literal, error = %e, "rejected regex literal");
                node.err("invalid regex");
                return;
            }
        },
        _ => {
            node.err("unable to coerce");
            return;
        }
    };
    if options.regex_as_string() {
        node.set(pattern.to_string());
    } else {
        node.set(pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Report;
    use crate::schema::{Schema, SchemaRef, SchemaSet};
    use crate::validator::validate;

    fn check_with(value: Value, schema: Schema, options: Options) -> Report {
        let set = SchemaSet::new();
        let ctx = Context::new(&value, &set, options);
        validate(&ctx, &value, &SchemaRef::inline(schema)).unwrap()
    }

    fn check(value: Value, schema: Schema) -> Report {
        check_with(value, schema, Options::new())
    }

    fn messages(diagnostics: &[crate::outcome::Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    fn number_schema(integer: bool, min: Option<f64>, max: Option<f64>) -> Schema {
        Schema::Number(NumberMeta { integer, min, max })
    }

    #[test]
    fn test_freeform_passes_anything() {
        let value = Value::from(serde_json::json!({"a": [1, null]}));
        let report = check(value.clone(), Schema::Freeform);
        assert_eq!(report.sanitized, Some(value));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_boolean_coercion() {
        let report = check(Value::from("false"), Schema::Boolean);
        assert_eq!(report.sanitized, Some(Value::Bool(false)));
        assert_eq!(messages(&report.warnings), ["type coercion"]);

        let report = check(Value::from("yes"), Schema::Boolean);
        assert_eq!(messages(&report.errors), ["unable to coerce"]);

        let report = check(Value::from(1), Schema::Boolean);
        assert_eq!(messages(&report.errors), ["unable to coerce"]);
    }

    #[test]
    fn test_number_from_string_warns() {
        let report = check(Value::from("5"), number_schema(true, Some(0.0), Some(10.0)));
        assert_eq!(report.sanitized, Some(Value::Number(5.0)));
        assert_eq!(messages(&report.warnings), ["type coercion"]);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_number_range_and_integer() {
        let schema = number_schema(true, Some(0.0), Some(10.0));
        let report = check(Value::from(11), schema.clone());
        assert_eq!(messages(&report.errors), ["maximum violated"]);
        let report = check(Value::from(5.5), schema.clone());
        assert_eq!(messages(&report.errors), ["not an integer"]);
        let report = check(Value::from(-1), schema);
        assert_eq!(messages(&report.errors), ["minimum violated"]);
    }

    #[test]
    fn test_number_bounds_are_inclusive() {
        let schema = number_schema(false, Some(0.0), Some(10.0));
        assert!(check(Value::from(0), schema.clone()).is_ok());
        assert!(check(Value::from(10), schema).is_ok());
    }

    #[test]
    fn test_number_string_forms() {
        let cases = [(" 3.0 ", 3.0), ("0x30", 48.0), ("0b101", 5.0), ("0o17", 15.0), ("1e3", 1000.0), ("-2.5", -2.5)];
        for (text, expected) in cases {
            let report = check(Value::from(text), number_schema(false, None, None));
            assert_eq!(report.sanitized, Some(Value::Number(expected)), "input {text:?}");
        }
    }

    #[test]
    fn test_number_rejects_non_numeric() {
        for value in [
            Value::from(""),
            Value::from("   "),
            Value::from("abc"),
            Value::from("Infinity"),
            Value::from("NaN"),
            Value::from("inf"),
            Value::from("0x"),
            Value::Null,
            Value::Bool(true),
            Value::Number(f64::NAN),
            Value::Number(f64::INFINITY),
        ] {
            let report = check(value.clone(), number_schema(false, None, None));
            assert_eq!(messages(&report.errors), ["unable to coerce"], "input {value:?}");
            assert!(report.sanitized.is_none());
        }
    }

    #[test]
    fn test_string_coerces_scalars() {
        let report = check(Value::from(42), Schema::String(StringMeta::default()));
        assert_eq!(report.sanitized, Some(Value::from("42")));
        assert_eq!(messages(&report.warnings), ["type coercion"]);

        let report = check(Value::Bool(true), Schema::String(StringMeta::default()));
        assert_eq!(report.sanitized, Some(Value::from("true")));

        let report = check(Value::Null, Schema::String(StringMeta::default()));
        assert_eq!(messages(&report.errors), ["unable to coerce"]);
    }

    #[test]
    fn test_string_lengths_count_characters() {
        let schema = Schema::String(StringMeta {
            max_length: Some(3),
            min_length: Some(3),
            ..StringMeta::default()
        });
        assert!(check(Value::from("héé"), schema.clone()).is_ok());
        let report = check(Value::from("abcd"), schema.clone());
        assert_eq!(messages(&report.errors), ["max length violated"]);
        let report = check(Value::from("ab"), schema);
        assert_eq!(messages(&report.errors), ["min length violated"]);
    }

    #[test]
    fn test_string_regex() {
        let schema = Schema::String(StringMeta {
            regex: Some(Pattern::parse("/^[a-z]+$/").unwrap()),
            ..StringMeta::default()
        });
        assert!(check(Value::from("abc"), schema.clone()).is_ok());
        let report = check(Value::from("ABC"), schema);
        assert_eq!(messages(&report.errors), ["regex violated"]);
    }

    #[test]
    fn test_string_root_index_against_self() {
        let schema = Schema::String(StringMeta {
            root_index: true,
            ..StringMeta::default()
        });
        // A bare string root has no keys.
        let report = check(Value::from("a"), schema);
        assert_eq!(messages(&report.errors), ["not a valid key into the root index"]);
    }

    #[test]
    fn test_string_root_index_into_list_root() {
        let schema = SchemaRef::inline(Schema::String(StringMeta {
            root_index: true,
            ..StringMeta::default()
        }));
        let root = Value::List(vec![Value::from("x"), Value::from("y")]);
        let set = SchemaSet::new();
        let ctx = Context::new(&root, &set, Options::new());
        let found = validate(&ctx, &Value::from("1"), &schema).unwrap();
        assert!(found.is_ok());
        for key in ["01", "+1", "2"] {
            let report = validate(&ctx, &Value::from(key), &schema).unwrap();
            assert_eq!(messages(&report.errors), ["not a valid key into the root index"], "{key:?}");
        }
    }

    #[test]
    fn test_string_confidential() {
        let schema = Schema::String(StringMeta {
            confidential: true,
            ..StringMeta::default()
        });
        let shown = check(Value::from("hunter2"), schema.clone());
        assert_eq!(shown.sanitized, Some(Value::from("hunter2")));
        let hidden = check_with(
            Value::from("hunter2"),
            schema,
            Options::new().with_hide_confidential(true),
        );
        assert_eq!(hidden.sanitized, Some(Value::from(CONFIDENTIAL_PLACEHOLDER)));
    }

    #[test]
    fn test_regex_from_literal() {
        let report = check(Value::from("/^a+$/i"), Schema::Regex);
        let pattern = report.sanitized.as_ref().and_then(Value::as_pattern).unwrap();
        assert_eq!(pattern.source(), "^a+$");
        assert_eq!(pattern.flags(), "i");
        assert!(pattern.is_match("AAA"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_regex_as_string_renders_literal() {
        let report = check_with(
            Value::from("/^a+$/mi"),
            Schema::Regex,
            Options::new().with_regex_as_string(true),
        );
        assert_eq!(report.sanitized, Some(Value::from("/^a+$/im")));
    }

    #[test]
    fn test_regex_failures() {
        for literal in ["no slashes", "/(/", "/a/g", "/(?=a)b/"] {
            let report = check(Value::from(literal), Schema::Regex);
            assert_eq!(messages(&report.errors), ["invalid regex"], "literal {literal:?}");
        }
        let report = check(Value::from(3), Schema::Regex);
        assert_eq!(messages(&report.errors), ["unable to coerce"]);
    }
}
