//! Validators for structured handler arguments that carry domain objects.

use crate::blog::BlogPost;
use crate::config::{
    ConfigProvider, LIST_OF_DEFAULT_TAGS_FOR_BLOG_POST, MAX_NUMBER_OF_TAGS_ASSIGNED_TO_BLOG_POST,
};
use crate::error::{invalid, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields of a blog post an author may change in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogPostChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

fn property<'a>(config: &'a impl ConfigProvider, name: &str) -> Result<&'a Value, ValidationError> {
    config
        .get_config_property(name)
        .map(|property| &property.value)
        .ok_or_else(|| ValidationError::new(format!("{} do not have any schema.", name)))
}

/// Tags must also come from the admin's default tag list and stay within
/// the admin's tag limit.
pub fn validate_change_dict_for_blog_post(
    change: &BlogPostChange,
    config: &impl ConfigProvider,
) -> Result<(), ValidationError> {
    if let Some(title) = &change.title {
        BlogPost::require_valid_title(title, true)?;
    }
    if let Some(filename) = &change.thumbnail_filename {
        BlogPost::require_valid_thumbnail_filename(filename)?;
    }
    if let Some(tags) = &change.tags {
        BlogPost::require_valid_tags(tags, true)?;

        let default_tags = property(config, LIST_OF_DEFAULT_TAGS_FOR_BLOG_POST)?;
        let is_default = |tag: &String| {
            default_tags
                .as_array()
                .is_some_and(|defaults| defaults.iter().any(|d| d.as_str() == Some(tag.as_str())))
        };
        if !tags.iter().all(is_default) {
            invalid!("Invalid tags provided. Tags not in default tags list.");
        }

        // A negative limit allows no tags.
        if let Some(max_tags) = property(config, MAX_NUMBER_OF_TAGS_ASSIGNED_TO_BLOG_POST)?.as_i64() {
            let max_tags = max_tags.max(0);
            if tags.len() as i64 > max_tags {
                invalid!(
                    "Blog post can have at most {} tags, received {}.",
                    max_tags,
                    tags.len()
                );
            }
        }
    }
    Ok(())
}

/// Normalize each proposed config property value against its property's
/// schema, returning the normalized values.
pub fn validate_new_config_property_values(
    values: &Map<String, Value>,
    config: &impl ConfigProvider,
) -> Result<Map<String, Value>, ValidationError> {
    let mut normalized = Map::new();
    for (name, value) in values {
        let Some(property) = config.get_config_property(name) else {
            invalid!("{} do not have any schema.", name);
        };
        normalized.insert(name.clone(), property.normalize(value)?);
    }
    Ok(normalized)
}

/// An improvement task entry needs its identifying fields; `null` counts as
/// absent.
pub fn validate_task_entry_for_improvements(entry: &Map<String, Value>) -> Result<(), ValidationError> {
    for field in ["entity_version", "task_type", "target_id", "status"] {
        if entry.get(field).map_or(true, Value::is_null) {
            invalid!("No {} provided", field);
        }
    }
    Ok(())
}
