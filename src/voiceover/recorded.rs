//! Legacy recorded voiceovers: content id -> language code -> voiceover.

use crate::error::{TranslationError, ValidationError};
use crate::i18n::LanguageRegistry;
use crate::voiceover::audio::Voiceover;
use crate::voiceover::mapping::{ContentLanguageMap, SlotRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

impl SlotRecord for Voiceover {
    fn validate(&self) -> Result<(), ValidationError> {
        Voiceover::validate(self)
    }

    fn needs_update(&self) -> bool {
        self.needs_update
    }

    fn mark_needs_update(&mut self) {
        Voiceover::mark_needs_update(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedVoiceovers {
    pub voiceovers_mapping: ContentLanguageMap<Voiceover>,
}

impl RecordedVoiceovers {
    pub fn new(mapping: BTreeMap<String, BTreeMap<String, Voiceover>>) -> Self {
        Self {
            voiceovers_mapping: ContentLanguageMap::from_slots(mapping),
        }
    }

    pub fn get_content_ids_for_voiceovers(&self) -> Vec<String> {
        self.voiceovers_mapping.content_ids()
    }

    pub fn get_voiceover(
        &self,
        content_id: &str,
        language_code: &str,
    ) -> Result<&Voiceover, TranslationError> {
        self.voiceovers_mapping.get(content_id, language_code)
    }

    /// Languages with at least one voiceover.
    pub fn get_language_codes(&self) -> Vec<String> {
        self.voiceovers_mapping.languages().into_iter().collect()
    }

    pub fn add_voiceover(
        &mut self,
        content_id: &str,
        language_code: &str,
        voiceover: Voiceover,
    ) -> Result<(), TranslationError> {
        voiceover.validate()?;
        self.voiceovers_mapping
            .insert(content_id, language_code, voiceover)?;
        Ok(())
    }

    pub fn delete_voiceover(
        &mut self,
        content_id: &str,
        language_code: &str,
    ) -> Result<Voiceover, TranslationError> {
        self.voiceovers_mapping.remove(content_id, language_code)
    }

    /// Drop every recorded voiceover but keep the content ids.
    pub fn strip_all_existing_voiceovers(&mut self) {
        self.voiceovers_mapping.clear_all_languages();
    }

    pub fn add_content_id_for_voiceover(&mut self, content_id: &str) -> Result<(), TranslationError> {
        self.voiceovers_mapping.add_content_id(content_id)
    }

    pub fn delete_content_id_for_voiceover(&mut self, content_id: &str) -> Result<(), TranslationError> {
        self.voiceovers_mapping.delete_content_id(content_id)
    }

    pub fn mark_voiceover_as_needing_update(
        &mut self,
        content_id: &str,
        language_code: &str,
    ) -> Result<(), TranslationError> {
        self.voiceovers_mapping
            .mark_as_needing_update(content_id, language_code)
    }

    pub fn mark_all_voiceovers_as_needing_update(
        &mut self,
        content_id: &str,
    ) -> Result<(), TranslationError> {
        self.voiceovers_mapping.mark_all_as_needing_update(content_id)
    }

    pub fn validate(&self, expected_content_ids: Option<&[String]>) -> Result<(), ValidationError> {
        let registry = LanguageRegistry::get();
        self.voiceovers_mapping
            .validate("recorded_voiceovers", expected_content_ids, |code| {
                registry.is_supported_audio_language_code(code)
            })
    }
}
