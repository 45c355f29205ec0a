//! Voiceovers of one entity version in one language accent.

use crate::error::{invalid, TranslationError, ValidationError};
use crate::i18n::language_accent_master_list;
use crate::translation::EntityType;
use crate::voiceover::audio::Voiceover;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a voiceover was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceoverType {
    Manual,
    Auto,
}

/// content id -> voiceover type -> voiceover
pub type VoiceoversMapping = BTreeMap<String, BTreeMap<VoiceoverType, Voiceover>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityVoiceovers {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub entity_version: u32,
    pub language_accent_code: String,
    pub voiceovers: VoiceoversMapping,
}

fn is_known_accent(code: &str) -> bool {
    language_accent_master_list()
        .values()
        .any(|accents| accents.contains_key(code))
}

impl EntityVoiceovers {
    pub fn create_empty(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_version: u32,
        language_accent_code: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type,
            entity_version,
            language_accent_code: language_accent_code.into(),
            voiceovers: BTreeMap::new(),
        }
    }

    /// `[entity_type]-[entity_id]-[entity_version]-[language_accent_code]`
    pub fn generate_id(
        entity_type: EntityType,
        entity_id: &str,
        entity_version: u32,
        language_accent_code: &str,
    ) -> String {
        format!(
            "{}-{}-{}-{}",
            entity_type, entity_id, entity_version, language_accent_code
        )
    }

    pub fn id(&self) -> String {
        Self::generate_id(
            self.entity_type,
            &self.entity_id,
            self.entity_version,
            &self.language_accent_code,
        )
    }

    pub fn get_voiceover(&self, content_id: &str, voiceover_type: VoiceoverType) -> Option<&Voiceover> {
        self.voiceovers.get(content_id)?.get(&voiceover_type)
    }

    /// Fill the `voiceover_type` slot for `content_id`, replacing any previous voiceover.
    pub fn add_voiceover(
        &mut self,
        content_id: &str,
        voiceover_type: VoiceoverType,
        voiceover: Voiceover,
    ) -> Result<Option<Voiceover>, TranslationError> {
        if content_id.is_empty() {
            invalid!("Expected content_id to be a non-empty string");
        }
        voiceover.validate()?;
        Ok(self
            .voiceovers
            .entry(content_id.to_string())
            .or_default()
            .insert(voiceover_type, voiceover))
    }

    /// Empty slot maps are dropped along with their last voiceover.
    pub fn remove_voiceover(
        &mut self,
        content_id: &str,
        voiceover_type: VoiceoverType,
    ) -> Result<Voiceover, TranslationError> {
        let slots = self
            .voiceovers
            .get_mut(content_id)
            .ok_or_else(|| TranslationError::InvalidContentId(content_id.to_string()))?;
        let removed = slots.remove(&voiceover_type).ok_or_else(|| {
            ValidationError::new(format!(
                "No {:?} voiceover exists for content id {}",
                voiceover_type, content_id
            ))
        })?;
        if slots.is_empty() {
            self.voiceovers.remove(content_id);
        }
        Ok(removed)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.entity_id.trim().is_empty() {
            invalid!("Expected entity_id to be a non-empty string");
        }
        if self.entity_version == 0 {
            invalid!("Expected entity_version to be at least 1, received 0");
        }
        if !is_known_accent(&self.language_accent_code) {
            invalid!(
                "Invalid language accent code: {}",
                self.language_accent_code
            );
        }
        for (content_id, slots) in &self.voiceovers {
            if content_id.is_empty() {
                invalid!("Expected content_id to be a non-empty string");
            }
            for voiceover in slots.values() {
                voiceover.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntityVoiceovers {
        let mut record = EntityVoiceovers::create_empty(EntityType::Exploration, "exp_1", 2, "en-US");
        record
            .add_voiceover("content_0", VoiceoverType::Manual, Voiceover::new("a.mp3", 100, 2.0))
            .unwrap();
        record
            .add_voiceover("content_0", VoiceoverType::Auto, Voiceover::new("b.mp3", 90, 1.9))
            .unwrap();
        record
    }

    #[test]
    fn test_id_format() {
        assert_eq!(sample().id(), "exploration-exp_1-2-en-US");
    }

    #[test]
    fn test_add_and_get_voiceover() {
        let record = sample();
        assert_eq!(
            record
                .get_voiceover("content_0", VoiceoverType::Auto)
                .map(|v| v.filename.as_str()),
            Some("b.mp3")
        );
        assert!(record.get_voiceover("content_1", VoiceoverType::Manual).is_none());
    }

    #[test]
    fn test_add_replaces_existing_slot() {
        let mut record = sample();
        let previous = record
            .add_voiceover("content_0", VoiceoverType::Manual, Voiceover::new("c.mp3", 10, 1.0))
            .unwrap();
        assert_eq!(previous.unwrap().filename, "a.mp3");
    }

    #[test]
    fn test_add_rejects_invalid_voiceover() {
        let mut record = sample();
        let err = record
            .add_voiceover("content_1", VoiceoverType::Manual, Voiceover::new("c.ogg", 10, 1.0))
            .unwrap_err();
        assert!(matches!(err, TranslationError::Validation(_)));
        assert!(!record.voiceovers.contains_key("content_1"));
    }

    #[test]
    fn test_remove_voiceover() {
        let mut record = sample();
        record.remove_voiceover("content_0", VoiceoverType::Manual).unwrap();
        assert!(record.voiceovers.contains_key("content_0"));

        record.remove_voiceover("content_0", VoiceoverType::Auto).unwrap();
        assert!(record.voiceovers.is_empty());

        let err = record
            .remove_voiceover("content_0", VoiceoverType::Auto)
            .unwrap_err();
        assert_eq!(err, TranslationError::InvalidContentId("content_0".to_string()));
    }

    #[test]
    fn test_remove_missing_slot() {
        let mut record = sample();
        record.remove_voiceover("content_0", VoiceoverType::Auto).unwrap();
        let err = record
            .remove_voiceover("content_0", VoiceoverType::Auto)
            .unwrap_err();
        assert!(err.to_string().contains("No Auto voiceover"));
    }

    #[test]
    fn test_validate_accent_code() {
        assert!(sample().validate().is_ok());

        let record = EntityVoiceovers::create_empty(EntityType::Exploration, "exp_1", 1, "en");
        let err = record.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid language accent code: en");
    }

    #[test]
    fn test_validate_version() {
        let record = EntityVoiceovers::create_empty(EntityType::Question, "q_1", 0, "hi-IN");
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_dict_form_uses_lowercase_slot_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["voiceovers"]["content_0"]["manual"]["filename"], "a.mp3");
        assert_eq!(value["entity_type"], "exploration");
    }
}
