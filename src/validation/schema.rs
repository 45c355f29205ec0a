//! Typed value schemas and normalization of JSON values against them.
//!
//! Normalization both checks and coerces: numeric strings become numbers for
//! `int`/`float`, `"true"`/`"false"` become booleans, and nested containers
//! are normalized element by element.

use crate::error::{invalid, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// One named field of a [`Schema::Dict`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictProperty {
    pub name: String,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schema {
    Unicode,
    Int,
    Float,
    Bool,
    List { items: Box<Schema> },
    /// Fixed set of keys, each with its own schema.
    Dict { properties: Vec<DictProperty> },
    /// Free-form keys sharing one value schema.
    DictOf { values: Box<Schema> },
    Any,
    Nullable { schema: Box<Schema> },
}

impl Schema {
    pub fn list(items: Schema) -> Self {
        Schema::List {
            items: Box::new(items),
        }
    }

    pub fn dict<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = (S, Schema)>,
        S: Into<String>,
    {
        Schema::Dict {
            properties: properties
                .into_iter()
                .map(|(name, schema)| DictProperty {
                    name: name.into(),
                    schema,
                })
                .collect(),
        }
    }

    pub fn dict_of(values: Schema) -> Self {
        Schema::DictOf {
            values: Box::new(values),
        }
    }

    pub fn nullable(self) -> Self {
        Schema::Nullable {
            schema: Box::new(self),
        }
    }
}

/// Checks a value against a schema and returns its normalized form.
pub trait SchemaNormalizer {
    fn normalize(&self, value: &Value, schema: &Schema) -> Result<Value, ValidationError>;
}

/// [`normalize_against_schema`] as a [`SchemaNormalizer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNormalizer;

impl SchemaNormalizer for DefaultNormalizer {
    fn normalize(&self, value: &Value, schema: &Schema) -> Result<Value, ValidationError> {
        normalize_against_schema(value, schema)
    }
}

/// Render a value the way error messages quote it: strings bare, everything
/// else as JSON.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "unicode",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn normalize_int(value: &Value) -> Result<Value, ValidationError> {
    let converted = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match converted {
        Some(n) => Ok(Value::from(n)),
        None => invalid!(
            "Could not convert {} to int: {}",
            type_name(value),
            display(value)
        ),
    }
}

fn normalize_float(value: &Value) -> Result<Value, ValidationError> {
    let converted = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    match converted.and_then(serde_json::Number::from_f64) {
        Some(n) => Ok(Value::Number(n)),
        None => invalid!(
            "Could not convert {} to float: {}",
            type_name(value),
            display(value)
        ),
    }
}

fn normalize_dict(value: &Value, properties: &[DictProperty]) -> Result<Value, ValidationError> {
    let Value::Object(object) = value else {
        invalid!("Expected dict, received {}", display(value));
    };

    let expected: BTreeSet<&str> = properties.iter().map(|p| p.name.as_str()).collect();
    let found: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    if expected != found {
        let missing: Vec<&str> = expected.difference(&found).copied().collect();
        let extra: Vec<&str> = found.difference(&expected).copied().collect();
        invalid!(
            "Missing keys: {:?}, Extra keys: {:?}",
            missing,
            extra
        );
    }

    let mut normalized = Map::new();
    for property in properties {
        let field = normalize_against_schema(&object[&property.name], &property.schema)?;
        normalized.insert(property.name.clone(), field);
    }
    Ok(Value::Object(normalized))
}

/// Check `value` against `schema`, returning the normalized value.
pub fn normalize_against_schema(value: &Value, schema: &Schema) -> Result<Value, ValidationError> {
    match schema {
        Schema::Any => Ok(value.clone()),
        Schema::Nullable { schema } => match value {
            Value::Null => Ok(Value::Null),
            other => normalize_against_schema(other, schema),
        },
        Schema::Unicode => match value {
            Value::String(_) => Ok(value.clone()),
            other => invalid!("Expected unicode string, received {}", display(other)),
        },
        Schema::Int => normalize_int(value),
        Schema::Float => normalize_float(value),
        Schema::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            other => invalid!("Expected bool, received {}", display(other)),
        },
        Schema::List { items } => {
            let Value::Array(elements) = value else {
                invalid!("Expected list, received {}", display(value));
            };
            elements
                .iter()
                .map(|element| normalize_against_schema(element, items))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Schema::Dict { properties } => normalize_dict(value, properties),
        Schema::DictOf { values } => {
            let Value::Object(object) = value else {
                invalid!("Expected dict, received {}", display(value));
            };
            let mut normalized = Map::new();
            for (key, field) in object {
                normalized.insert(key.clone(), normalize_against_schema(field, values)?);
            }
            Ok(Value::Object(normalized))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error(value: Value, schema: &Schema) -> String {
        normalize_against_schema(&value, schema)
            .unwrap_err()
            .to_string()
    }

    // ==================== Scalar Tests ====================

    #[test]
    fn test_unicode() {
        assert_eq!(
            normalize_against_schema(&json!("exp_1"), &Schema::Unicode).unwrap(),
            json!("exp_1")
        );
        assert_eq!(error(json!(2), &Schema::Unicode), "Expected unicode string, received 2");
    }

    #[test]
    fn test_int_coerces_numeric_strings() {
        assert_eq!(
            normalize_against_schema(&json!("12"), &Schema::Int).unwrap(),
            json!(12)
        );
        assert_eq!(
            error(json!("random_string"), &Schema::Int),
            "Could not convert unicode to int: random_string"
        );
        assert_eq!(error(json!(1.5), &Schema::Int), "Could not convert float to int: 1.5");
    }

    #[test]
    fn test_float() {
        assert_eq!(
            normalize_against_schema(&json!("2.5"), &Schema::Float).unwrap(),
            json!(2.5)
        );
        assert_eq!(
            normalize_against_schema(&json!(3), &Schema::Float).unwrap(),
            json!(3.0)
        );
        assert!(normalize_against_schema(&json!("NaN"), &Schema::Float).is_err());
    }

    #[test]
    fn test_bool() {
        assert_eq!(
            normalize_against_schema(&json!("true"), &Schema::Bool).unwrap(),
            json!(true)
        );
        assert_eq!(error(json!(1), &Schema::Bool), "Expected bool, received 1");
    }

    #[test]
    fn test_nullable() {
        let schema = Schema::Unicode.nullable();
        assert_eq!(normalize_against_schema(&Value::Null, &schema).unwrap(), Value::Null);
        assert!(normalize_against_schema(&Value::Null, &Schema::Unicode).is_err());
    }

    // ==================== Container Tests ====================

    #[test]
    fn test_list_normalizes_items() {
        let schema = Schema::list(Schema::Int);
        assert_eq!(
            normalize_against_schema(&json!(["1", 2]), &schema).unwrap(),
            json!([1, 2])
        );
        assert_eq!(error(json!("1"), &schema), "Expected list, received 1");
    }

    #[test]
    fn test_dict_requires_exact_keys() {
        let schema = Schema::dict([("name", Schema::Unicode), ("count", Schema::Int)]);
        assert_eq!(
            normalize_against_schema(&json!({"name": "a", "count": "3"}), &schema).unwrap(),
            json!({"name": "a", "count": 3})
        );

        let message = error(json!({"name": "a", "other": 1}), &schema);
        assert_eq!(message, r#"Missing keys: ["count"], Extra keys: ["other"]"#);
        assert_eq!(error(json!("en-US"), &schema), "Expected dict, received en-US");
    }

    #[test]
    fn test_dict_of() {
        let schema = Schema::dict_of(Schema::dict_of(Schema::Bool));
        let value = json!({"en": {"en-US": true, "en-IN": "false"}});
        assert_eq!(
            normalize_against_schema(&value, &schema).unwrap(),
            json!({"en": {"en-US": true, "en-IN": false}})
        );
        assert_eq!(
            error(json!({"en": "en-US"}), &schema),
            "Expected dict, received en-US"
        );
    }

    #[test]
    fn test_schema_dict_form() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "list",
            "items": {"type": "nullable", "schema": {"type": "unicode"}}
        }))
        .unwrap();
        assert_eq!(schema, Schema::list(Schema::Unicode.nullable()));
    }

    #[test]
    fn test_default_normalizer_delegates() {
        let normalized = DefaultNormalizer.normalize(&json!("7"), &Schema::Int).unwrap();
        assert_eq!(normalized, json!(7));
    }
}
