use crate::error::ValidationError;
use crate::validation::schema::{normalize_against_schema, Schema};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const LIST_OF_DEFAULT_TAGS_FOR_BLOG_POST: &str = "list_of_default_tags_for_blog_post";
pub const MAX_NUMBER_OF_TAGS_ASSIGNED_TO_BLOG_POST: &str =
    "max_number_of_tags_assigned_to_blog_post";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub database_path: String,
    pub port: u16,
    pub admin_api_key: Option<String>,

    // Translation provider
    pub translation_api_url: String,
    pub translation_api_key: String,
    pub translation_model: String,

    // Admin-controlled defaults
    pub default_blog_tags: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {}", port))?,
            None => 8080,
        };

        Ok(Self {
            // Server
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "translations.db".to_string()),
            port,
            admin_api_key: lookup("ADMIN_API_KEY").filter(|key| !key.is_empty()),

            // Translation provider
            translation_api_url: lookup("TRANSLATION_API_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string()),
            translation_api_key: lookup("TRANSLATION_API_KEY")
                .context("TRANSLATION_API_KEY not set")?,
            translation_model: lookup("TRANSLATION_MODEL")
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),

            // Admin-controlled defaults
            default_blog_tags: lookup("DEFAULT_BLOG_TAGS")
                .map(|tags| {
                    tags.split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

/// An admin-editable value with the schema its updates must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigProperty {
    pub name: String,
    pub description: String,
    pub schema: Schema,
    pub value: Value,
}

impl ConfigProperty {
    pub fn normalize(&self, value: &Value) -> Result<Value, ValidationError> {
        normalize_against_schema(value, &self.schema)
    }

    /// The value as a list of strings; empty if it is anything else.
    pub fn string_list(&self) -> Vec<String> {
        self.value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Source of admin-controlled configuration properties.
pub trait ConfigProvider {
    fn get_config_property(&self, name: &str) -> Option<&ConfigProperty>;
}

/// In-memory [`ConfigProvider`] seeded from [`Config`].
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    properties: BTreeMap<String, ConfigProperty>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register(ConfigProperty {
            name: LIST_OF_DEFAULT_TAGS_FOR_BLOG_POST.to_string(),
            description: "List of tags blog post authors may choose from".to_string(),
            schema: Schema::list(Schema::Unicode),
            value: Value::from(config.default_blog_tags.clone()),
        });
        registry.register(ConfigProperty {
            name: MAX_NUMBER_OF_TAGS_ASSIGNED_TO_BLOG_POST.to_string(),
            description: "Maximum number of tags a blog post may carry".to_string(),
            schema: Schema::Int,
            value: Value::from(10),
        });
        registry
    }

    pub fn register(&mut self, property: ConfigProperty) {
        self.properties.insert(property.name.clone(), property);
    }

    /// Replace a property's value with `value` normalized against its schema.
    pub fn set_value(&mut self, name: &str, value: &Value) -> Result<(), ValidationError> {
        let property = self
            .properties
            .get_mut(name)
            .ok_or_else(|| ValidationError::new(format!("{} do not have any schema.", name)))?;
        property.value = property.normalize(value)?;
        Ok(())
    }

    pub fn properties(&self) -> impl Iterator<Item = &ConfigProperty> {
        self.properties.values()
    }
}

impl ConfigProvider for PropertyRegistry {
    fn get_config_property(&self, name: &str) -> Option<&ConfigProperty> {
        self.properties.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("TRANSLATION_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.database_path, "translations.db");
        assert_eq!(config.port, 8080);
        assert!(config.admin_api_key.is_none());
        assert_eq!(config.translation_model, "gpt-4o-mini");
        assert!(config.default_blog_tags.is_empty());
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("TRANSLATION_API_KEY"));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[
            ("TRANSLATION_API_KEY", "sk-test"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TRANSLATION_API_KEY", "sk-test"),
            ("PORT", "3000"),
            ("ADMIN_API_KEY", "admin"),
            ("DEFAULT_BLOG_TAGS", "News, Learners ,,Community"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.admin_api_key.as_deref(), Some("admin"));
        assert_eq!(config.default_blog_tags, vec!["News", "Learners", "Community"]);
    }

    #[test]
    fn test_empty_admin_key_disables_admin_routes() {
        let config = Config::from_lookup(lookup(&[
            ("TRANSLATION_API_KEY", "sk-test"),
            ("ADMIN_API_KEY", ""),
        ]))
        .unwrap();
        assert!(config.admin_api_key.is_none());
    }

    // ==================== Property Registry Tests ====================

    fn registry() -> PropertyRegistry {
        let config = Config::from_lookup(lookup(&[
            ("TRANSLATION_API_KEY", "sk-test"),
            ("DEFAULT_BLOG_TAGS", "News,Learners"),
        ]))
        .unwrap();
        PropertyRegistry::from_config(&config)
    }

    #[test]
    fn test_registry_seeded_from_config() {
        let registry = registry();
        let tags = registry
            .get_config_property(LIST_OF_DEFAULT_TAGS_FOR_BLOG_POST)
            .unwrap();
        assert_eq!(tags.string_list(), vec!["News", "Learners"]);
        assert!(registry.get_config_property("missing").is_none());
    }

    #[test]
    fn test_set_value_normalizes() {
        let mut registry = registry();
        registry
            .set_value(MAX_NUMBER_OF_TAGS_ASSIGNED_TO_BLOG_POST, &json!("5"))
            .unwrap();
        assert_eq!(
            registry
                .get_config_property(MAX_NUMBER_OF_TAGS_ASSIGNED_TO_BLOG_POST)
                .unwrap()
                .value,
            json!(5)
        );
    }

    #[test]
    fn test_set_value_rejects_bad_value() {
        let mut registry = registry();
        let err = registry
            .set_value(LIST_OF_DEFAULT_TAGS_FOR_BLOG_POST, &json!("News"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected list, received News");

        let err = registry.set_value("unknown", &json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "unknown do not have any schema.");
    }
}
