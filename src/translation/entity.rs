//! Per entity/version/language translation records.

use crate::error::{invalid, TranslationError, ValidationError};
use crate::i18n::LanguageRegistry;
use crate::translation::content::TranslatedContent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of domain object that owns translatable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Exploration,
    Question,
    Skill,
    Topic,
    Story,
    BlogPost,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Exploration,
        EntityType::Question,
        EntityType::Skill,
        EntityType::Topic,
        EntityType::Story,
        EntityType::BlogPost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Exploration => "exploration",
            EntityType::Question => "question",
            EntityType::Skill => "skill",
            EntityType::Topic => "topic",
            EntityType::Story => "story",
            EntityType::BlogPost => "blog_post",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|entity_type| entity_type.as_str() == s)
            .ok_or_else(|| ValidationError::new(format!("Invalid entity type: {}", s)))
    }
}

/// A change to an entity that affects its existing translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum TranslationChange {
    /// The source content changed; keep the translation but flag it stale.
    MarkTranslationNeedsUpdate { content_hash: String },
    /// The source content was deleted.
    RemoveTranslation { content_hash: String },
}

/// Translations of one entity version into one language, keyed by the hash of
/// the source content each translation covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTranslations {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub entity_version: u32,
    pub language_code: String,
    pub translations: BTreeMap<String, TranslatedContent>,
}

impl EntityTranslations {
    pub fn new(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_version: u32,
        language_code: impl Into<String>,
        translations: BTreeMap<String, TranslatedContent>,
    ) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
            entity_version,
            language_code: language_code.into(),
            translations,
        }
    }

    pub fn create_empty(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_version: u32,
        language_code: impl Into<String>,
    ) -> Self {
        Self::new(
            entity_type,
            entity_id,
            entity_version,
            language_code,
            BTreeMap::new(),
        )
    }

    /// `[entity_type]-[entity_id]-[entity_version]-[language_code]`
    pub fn generate_id(
        entity_type: EntityType,
        entity_id: &str,
        entity_version: u32,
        language_code: &str,
    ) -> String {
        format!(
            "{}-{}-{}-{}",
            entity_type, entity_id, entity_version, language_code
        )
    }

    pub fn id(&self) -> String {
        Self::generate_id(
            self.entity_type,
            &self.entity_id,
            self.entity_version,
            &self.language_code,
        )
    }

    /// Store a translation under the hash of the content it translates,
    /// returning whatever it replaced.
    pub fn add_translation(&mut self, translated: TranslatedContent) -> Option<TranslatedContent> {
        self.translations
            .insert(translated.content_hash.clone(), translated)
    }

    pub fn get_translation(&self, content_hash: &str) -> Option<&TranslatedContent> {
        self.translations.get(content_hash)
    }

    pub fn remove_translation(
        &mut self,
        content_hash: &str,
    ) -> Result<TranslatedContent, TranslationError> {
        self.translations
            .remove(content_hash)
            .ok_or_else(|| TranslationError::InvalidContentId(content_hash.to_string()))
    }

    pub fn mark_translation_as_needing_update(
        &mut self,
        content_hash: &str,
    ) -> Result<(), TranslationError> {
        self.translations
            .get_mut(content_hash)
            .ok_or_else(|| TranslationError::InvalidContentId(content_hash.to_string()))?
            .mark_needs_update();
        Ok(())
    }

    /// Number of translations that are not stale.
    pub fn up_to_date_count(&self) -> usize {
        self.translations
            .values()
            .filter(|translated| !translated.needs_update)
            .count()
    }

    /// Build the record for the next entity version, applying `changes`.
    ///
    /// `self` is left untouched: a record is superseded, never mutated, when
    /// its entity advances. Changes naming a hash this record does not hold
    /// are ignored. Fails when the version cannot advance.
    pub fn next_version(
        &self,
        changes: &[TranslationChange],
    ) -> Result<EntityTranslations, ValidationError> {
        let Some(next_version) = self.entity_version.checked_add(1) else {
            invalid!(
                "Entity version {} of {} cannot be advanced",
                self.entity_version,
                self.id()
            );
        };
        let mut next = self.clone();
        next.entity_version = next_version;
        for change in changes {
            match change {
                TranslationChange::MarkTranslationNeedsUpdate { content_hash } => {
                    if let Some(translated) = next.translations.get_mut(content_hash) {
                        translated.mark_needs_update();
                    }
                }
                TranslationChange::RemoveTranslation { content_hash } => {
                    next.translations.remove(content_hash);
                }
            }
        }
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.entity_id.trim().is_empty() {
            invalid!("Expected entity_id to be a non-empty string");
        }
        if self.entity_version == 0 {
            invalid!("Expected entity_version to be at least 1, received 0");
        }
        if !LanguageRegistry::get().is_valid_language_code(&self.language_code) {
            invalid!("Invalid language code: {}", self.language_code);
        }
        for (content_hash, translated) in &self.translations {
            if &translated.content_hash != content_hash {
                invalid!(
                    "Translation stored under {} covers content {}",
                    content_hash,
                    translated.content_hash
                );
            }
            translated.validate()?;
        }
        Ok(())
    }
}
