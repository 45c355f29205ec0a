//! Request argument validation.
//!
//! - `schema`: typed value schemas and normalization
//! - `payload`: accumulating validation of handler arguments
//! - `domain_objects`: validators for arguments carrying domain objects

pub mod domain_objects;
pub mod payload;
pub mod schema;

pub use domain_objects::{
    validate_change_dict_for_blog_post, validate_new_config_property_values,
    validate_task_entry_for_improvements, BlogPostChange,
};
pub use payload::{validate, validate_and_normalize, ArgPresence, ArgSchema, HandlerArgsSchema};
pub use schema::{normalize_against_schema, DefaultNormalizer, DictProperty, Schema, SchemaNormalizer};
