//! Validation of handler arguments against a per-argument schema.
//!
//! Unlike the domain validators, this pass never stops at the first problem:
//! every failure is collected so a request can be rejected with the full list.

use crate::validation::schema::{Schema, SchemaNormalizer};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// What happens when an argument is absent from the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgPresence {
    Required,
    /// Skipped when absent.
    Optional,
    /// Filled with this value when absent.
    Default(Value),
}

/// Schema for one handler argument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawArgSchema")]
pub struct ArgSchema {
    pub schema: Schema,
    pub presence: ArgPresence,
}

impl ArgSchema {
    pub fn required(schema: Schema) -> Self {
        Self {
            schema,
            presence: ArgPresence::Required,
        }
    }

    pub fn optional(schema: Schema) -> Self {
        Self {
            schema,
            presence: ArgPresence::Optional,
        }
    }

    pub fn with_default(schema: Schema, default: impl Into<Value>) -> Self {
        Self {
            schema,
            presence: ArgPresence::Default(default.into()),
        }
    }

    /// A present `null` is accepted for optional arguments and for those
    /// defaulting to `null`.
    fn accepts_null(&self) -> bool {
        matches!(
            self.presence,
            ArgPresence::Optional | ArgPresence::Default(Value::Null)
        )
    }
}

/// Keeps `"default_value": null` distinct from a missing key.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArgSchema {
    #[serde(default = "any_schema")]
    schema: Schema,
    #[serde(default)]
    optional: bool,
    #[serde(default, alias = "default", deserialize_with = "present")]
    default_value: Option<Value>,
}

fn any_schema() -> Schema {
    Schema::Any
}

impl TryFrom<RawArgSchema> for ArgSchema {
    type Error = String;

    fn try_from(raw: RawArgSchema) -> Result<Self, Self::Error> {
        let presence = match (raw.optional, raw.default_value) {
            (true, Some(_)) => {
                return Err("An argument cannot be both optional and have a default_value".into())
            }
            (true, None) => ArgPresence::Optional,
            (false, Some(default)) => ArgPresence::Default(default),
            (false, None) => ArgPresence::Required,
        };
        Ok(Self {
            schema: raw.schema,
            presence,
        })
    }
}

/// Ordered argument name -> schema table for one handler method.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, ArgSchema>")]
pub struct HandlerArgsSchema {
    args: Vec<(String, ArgSchema)>,
}

impl From<BTreeMap<String, ArgSchema>> for HandlerArgsSchema {
    fn from(args: BTreeMap<String, ArgSchema>) -> Self {
        Self {
            args: args.into_iter().collect(),
        }
    }
}

impl HandlerArgsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, name: impl Into<String>, schema: ArgSchema) -> Self {
        self.args.push((name.into(), schema));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgSchema> {
        self.args
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, schema)| schema)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|(name, _)| name.as_str())
    }
}

/// Validate `args` against `schema` and return the normalized arguments,
/// defaults included, or every error found.
///
/// Extra arguments are only reported when `strict` is set.
pub fn validate_and_normalize(
    args: &Map<String, Value>,
    schema: &HandlerArgsSchema,
    strict: bool,
    normalizer: &impl SchemaNormalizer,
) -> Result<Map<String, Value>, Vec<String>> {
    let mut errors = Vec::new();
    let mut missing = BTreeSet::new();
    let mut normalized = Map::new();

    for (name, arg_schema) in &schema.args {
        let value = match (args.get(name), &arg_schema.presence) {
            (Some(Value::Null), _) if arg_schema.accepts_null() => {
                normalized.insert(name.clone(), Value::Null);
                continue;
            }
            (Some(value), _) => value,
            (None, ArgPresence::Optional) => continue,
            (None, ArgPresence::Default(Value::Null)) => {
                normalized.insert(name.clone(), Value::Null);
                continue;
            }
            (None, ArgPresence::Default(default)) => default,
            (None, ArgPresence::Required) => {
                missing.insert(name.as_str());
                continue;
            }
        };

        match normalizer.normalize(value, &arg_schema.schema) {
            Ok(value) => {
                normalized.insert(name.clone(), value);
            }
            Err(e) => errors.push(format!("Schema validation for '{}' failed: {}", name, e)),
        }
    }

    if !missing.is_empty() {
        errors.push(format!(
            "Missing args: {}",
            missing.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    if strict {
        let known: BTreeSet<&str> = schema.names().collect();
        let extra: BTreeSet<&str> = args
            .keys()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect();
        if !extra.is_empty() {
            errors.push(format!(
                "Found extra args: {}",
                extra.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

/// Every problem with `args`, in schema order, followed by missing and then
/// extra arguments. Empty when the arguments are valid.
pub fn validate(
    args: &Map<String, Value>,
    schema: &HandlerArgsSchema,
    strict: bool,
    normalizer: &impl SchemaNormalizer,
) -> Vec<String> {
    validate_and_normalize(args, schema, strict, normalizer)
        .err()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::schema::DefaultNormalizer;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test args must be an object"),
        }
    }

    fn run(value: Value, schema: &HandlerArgsSchema, strict: bool) -> Vec<String> {
        validate(&args(value), schema, strict, &DefaultNormalizer)
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_wrong_type_reports_schema_failure() {
        let schema = HandlerArgsSchema::new().arg("exploration_id", ArgSchema::required(Schema::Unicode));
        assert_eq!(
            run(json!({"exploration_id": 2}), &schema, false),
            vec!["Schema validation for 'exploration_id' failed: Expected unicode string, received 2"]
        );
    }

    #[test]
    fn test_unconvertible_int() {
        let schema = HandlerArgsSchema::new().arg("version", ArgSchema::required(Schema::Int));
        assert_eq!(
            run(json!({"version": "random_string"}), &schema, false),
            vec!["Schema validation for 'version' failed: Could not convert unicode to int: random_string"]
        );
    }

    #[test]
    fn test_extra_args_only_in_strict_mode() {
        let schema = HandlerArgsSchema::new();
        assert!(run(json!({"exploration_id": "any_exp_id"}), &schema, false).is_empty());
        assert_eq!(
            run(json!({"b": 1, "a": 2}), &schema, true),
            vec!["Found extra args: a, b"]
        );
    }

    #[test]
    fn test_missing_args_are_sorted() {
        let schema = HandlerArgsSchema::new()
            .arg("zeta", ArgSchema::required(Schema::Int))
            .arg("alpha", ArgSchema::required(Schema::Int));
        assert_eq!(run(json!({}), &schema, true), vec!["Missing args: alpha, zeta"]);
    }

    #[test]
    fn test_errors_accumulate() {
        let schema = HandlerArgsSchema::new()
            .arg("id", ArgSchema::required(Schema::Unicode))
            .arg("version", ArgSchema::required(Schema::Int))
            .arg("lang", ArgSchema::required(Schema::Unicode));
        let errors = run(json!({"id": 5, "version": "x", "other": true}), &schema, true);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("Schema validation for 'id'"));
        assert!(errors[1].starts_with("Schema validation for 'version'"));
        assert_eq!(errors[2], "Missing args: lang");
        assert_eq!(errors[3], "Found extra args: other");
    }

    // ==================== Presence Tests ====================

    #[test]
    fn test_default_fills_missing_arg() {
        let schema = HandlerArgsSchema::new().arg("x", ArgSchema::with_default(Schema::Int, 5));
        assert!(run(json!({}), &schema, true).is_empty());

        let normalized =
            validate_and_normalize(&Map::new(), &schema, true, &DefaultNormalizer).unwrap();
        assert_eq!(normalized["x"], json!(5));
    }

    #[test]
    fn test_invalid_default_is_reported() {
        let schema =
            HandlerArgsSchema::new().arg("x", ArgSchema::with_default(Schema::Int, "five"));
        assert_eq!(
            run(json!({}), &schema, true),
            vec!["Schema validation for 'x' failed: Could not convert unicode to int: five"]
        );
    }

    #[test]
    fn test_null_default_accepts_absent_and_null() {
        let schema = HandlerArgsSchema::new()
            .arg("exploration_id", ArgSchema::with_default(Schema::Unicode, Value::Null));
        assert!(run(json!({}), &schema, false).is_empty());
        assert!(run(json!({"exploration_id": null}), &schema, false).is_empty());
        assert!(run(json!({"exploration_id": "any_exp_id"}), &schema, false).is_empty());
    }

    #[test]
    fn test_optional_arg_skipped_when_absent() {
        let schema = HandlerArgsSchema::new().arg("cursor", ArgSchema::optional(Schema::Unicode));
        let normalized =
            validate_and_normalize(&Map::new(), &schema, true, &DefaultNormalizer).unwrap();
        assert!(normalized.is_empty());
        assert_eq!(
            run(json!({"cursor": 3}), &schema, true),
            vec!["Schema validation for 'cursor' failed: Expected unicode string, received 3"]
        );
    }

    #[test]
    fn test_schema_is_not_consumed_by_validation() {
        let schema = HandlerArgsSchema::new().arg("x", ArgSchema::with_default(Schema::Int, 5));
        let before = schema.clone();
        run(json!({}), &schema, true);
        run(json!({}), &schema, true);
        assert_eq!(schema, before);
    }

    // ==================== Dict Form Tests ====================

    #[test]
    fn test_handler_schema_from_dict_form() {
        let schema: HandlerArgsSchema = serde_json::from_value(json!({
            "x": {"schema": {"type": "int"}, "default_value": 5},
            "cursor": {"schema": {"type": "unicode"}, "optional": true},
            "exploration_id": {"schema": {"type": "unicode"}, "default_value": null}
        }))
        .unwrap();

        assert_eq!(schema.get("x").unwrap().presence, ArgPresence::Default(json!(5)));
        assert_eq!(schema.get("cursor").unwrap().presence, ArgPresence::Optional);
        assert_eq!(
            schema.get("exploration_id").unwrap().presence,
            ArgPresence::Default(Value::Null)
        );
        assert!(run(json!({}), &schema, true).is_empty());
    }

    #[test]
    fn test_default_key_spelling() {
        let schema: HandlerArgsSchema = serde_json::from_value(json!({
            "x": {"schema": {"type": "int"}, "default": 5}
        }))
        .unwrap();
        assert_eq!(schema.get("x").unwrap().presence, ArgPresence::Default(json!(5)));
        assert!(run(json!({}), &schema, true).is_empty());

        // Without a schema the default is accepted as is
        let bare: HandlerArgsSchema = serde_json::from_value(json!({"x": {"default": 5}})).unwrap();
        assert_eq!(bare.get("x").unwrap().schema, Schema::Any);
        assert!(run(json!({}), &bare, true).is_empty());
    }

    #[test]
    fn test_optional_with_default_rejected() {
        let result: Result<ArgSchema, _> = serde_json::from_value(json!({
            "schema": {"type": "int"},
            "optional": true,
            "default_value": 1
        }));
        assert!(result.is_err());
    }
}
