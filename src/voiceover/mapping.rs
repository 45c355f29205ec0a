//! Shared storage for the legacy per-content, per-language containers.

use crate::error::{invalid, TranslationError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A record stored in one (content id, language) slot.
pub trait SlotRecord {
    fn validate(&self) -> Result<(), ValidationError>;
    fn needs_update(&self) -> bool;
    fn mark_needs_update(&mut self);
}

/// content id -> language code -> record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLanguageMap<T> {
    slots: BTreeMap<String, BTreeMap<String, T>>,
}

impl<T> Default for ContentLanguageMap<T> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<T: SlotRecord> ContentLanguageMap<T> {
    pub fn from_slots(slots: BTreeMap<String, BTreeMap<String, T>>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &BTreeMap<String, BTreeMap<String, T>> {
        &self.slots
    }

    pub fn content_ids(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }

    pub fn add_content_id(&mut self, content_id: &str) -> Result<(), TranslationError> {
        if self.slots.contains_key(content_id) {
            invalid!("The content_id {} already exist.", content_id);
        }
        self.slots.insert(content_id.to_string(), BTreeMap::new());
        Ok(())
    }

    pub fn delete_content_id(&mut self, content_id: &str) -> Result<(), TranslationError> {
        if self.slots.remove(content_id).is_none() {
            invalid!("The content_id {} does not exist.", content_id);
        }
        Ok(())
    }

    pub fn get(&self, content_id: &str, language_code: &str) -> Result<&T, TranslationError> {
        self.slots
            .get(content_id)
            .ok_or_else(|| TranslationError::InvalidContentId(content_id.to_string()))?
            .get(language_code)
            .ok_or_else(|| {
                ValidationError::new(format!("Invalid language_code: {}", language_code)).into()
            })
    }

    /// Fill the slot for `language_code`; the content id must already exist.
    pub fn insert(
        &mut self,
        content_id: &str,
        language_code: &str,
        record: T,
    ) -> Result<Option<T>, TranslationError> {
        let languages = self
            .slots
            .get_mut(content_id)
            .ok_or_else(|| TranslationError::InvalidContentId(content_id.to_string()))?;
        Ok(languages.insert(language_code.to_string(), record))
    }

    pub fn remove(&mut self, content_id: &str, language_code: &str) -> Result<T, TranslationError> {
        let languages = self
            .slots
            .get_mut(content_id)
            .ok_or_else(|| TranslationError::InvalidContentId(content_id.to_string()))?;
        languages.remove(language_code).ok_or_else(|| {
            ValidationError::new(format!("Invalid language_code: {}", language_code)).into()
        })
    }

    pub fn mark_as_needing_update(
        &mut self,
        content_id: &str,
        language_code: &str,
    ) -> Result<(), TranslationError> {
        let record = self
            .slots
            .get_mut(content_id)
            .ok_or_else(|| TranslationError::InvalidContentId(content_id.to_string()))?
            .get_mut(language_code)
            .ok_or_else(|| {
                TranslationError::from(ValidationError::new(format!(
                    "Invalid language_code: {}",
                    language_code
                )))
            })?;
        record.mark_needs_update();
        Ok(())
    }

    pub fn mark_all_as_needing_update(&mut self, content_id: &str) -> Result<(), TranslationError> {
        let languages = self
            .slots
            .get_mut(content_id)
            .ok_or_else(|| TranslationError::InvalidContentId(content_id.to_string()))?;
        languages.values_mut().for_each(T::mark_needs_update);
        Ok(())
    }

    /// Content ids holding an up-to-date record in `language_code`.
    pub fn content_ids_up_to_date_in(&self, language_code: &str) -> Vec<String> {
        self.slots
            .iter()
            .filter(|(_, languages)| {
                languages
                    .get(language_code)
                    .is_some_and(|record| !record.needs_update())
            })
            .map(|(content_id, _)| content_id.clone())
            .collect()
    }

    /// Languages having a record for at least one content id.
    pub fn languages(&self) -> BTreeSet<String> {
        self.slots
            .values()
            .flat_map(|languages| languages.keys().cloned())
            .collect()
    }

    pub fn clear_all_languages(&mut self) {
        self.slots.values_mut().for_each(BTreeMap::clear);
    }

    /// Check the key set against `expected_content_ids` (when given), every
    /// language code against `is_supported_language`, and every record.
    pub fn validate(
        &self,
        container_name: &str,
        expected_content_ids: Option<&[String]>,
        is_supported_language: impl Fn(&str) -> bool,
    ) -> Result<(), ValidationError> {
        if let Some(expected) = expected_content_ids {
            let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
            let found: BTreeSet<&str> = self.slots.keys().map(String::as_str).collect();
            if expected != found {
                invalid!(
                    "Expected state {} to match the listed content ids {:?}, found {:?}",
                    container_name,
                    expected,
                    found
                );
            }
        }

        for (content_id, languages) in &self.slots {
            if content_id.is_empty() {
                invalid!("Expected content_id to be a non-empty string");
            }
            for (language_code, record) in languages {
                if !is_supported_language(language_code) {
                    invalid!("Invalid language_code: {}", language_code);
                }
                record.validate()?;
            }
        }
        Ok(())
    }
}
