//! Content translation tracking.
//!
//! # Architecture
//!
//! - `content`: Translatable source contents and their translations
//! - `registry`: The `Translatable` capability and gap detection
//! - `entity`: Per entity/version/language translation records
//! - `machine`: Machine translation records
//! - `translator`: Machine translation provider
//! - `services`: Workflows combining the above with the database

mod content;
mod entity;
mod machine;
mod registry;
pub mod services;
mod translator;

pub use content::{
    convert_to_hash, require_value_matches_format, ContentFormat, ContentValue,
    TranslatableContent, TranslatedContent, MAX_LENGTH_FOR_CONTENT_HASH,
};
pub use entity::{EntityTranslations, EntityType, TranslationChange};
pub use machine::MachineTranslation;
pub use registry::{contents_which_need_translations, Translatable, TranslatableContentsCollection};
pub use translator::{HttpTranslator, MachineTranslator, TranslatorError};
