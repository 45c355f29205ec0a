//! Legacy written translations: content id -> language code -> translation.

use crate::error::{invalid, TranslationError, ValidationError};
use crate::i18n::LanguageRegistry;
use crate::translation::{require_value_matches_format, ContentFormat, ContentValue};
use crate::voiceover::mapping::{ContentLanguageMap, SlotRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A written translation of one content id into one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenTranslation {
    pub data_format: ContentFormat,
    pub translation: ContentValue,
    #[serde(default)]
    pub needs_update: bool,
}

impl WrittenTranslation {
    pub fn new(data_format: ContentFormat, translation: impl Into<ContentValue>) -> Self {
        Self {
            data_format,
            translation: translation.into(),
            needs_update: false,
        }
    }
}

impl SlotRecord for WrittenTranslation {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.data_format == ContentFormat::Object {
            invalid!("Invalid data_format: {}", self.data_format);
        }
        require_value_matches_format(self.data_format, &self.translation)
    }

    fn needs_update(&self) -> bool {
        self.needs_update
    }

    fn mark_needs_update(&mut self) {
        self.needs_update = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WrittenTranslations {
    pub translations_mapping: ContentLanguageMap<WrittenTranslation>,
}

impl WrittenTranslations {
    pub fn new(mapping: BTreeMap<String, BTreeMap<String, WrittenTranslation>>) -> Self {
        Self {
            translations_mapping: ContentLanguageMap::from_slots(mapping),
        }
    }

    pub fn get_content_ids_for_text_translation(&self) -> Vec<String> {
        self.translations_mapping.content_ids()
    }

    /// Content ids with an up-to-date translation in `language_code`.
    pub fn get_content_ids_that_are_correctly_translated(&self, language_code: &str) -> Vec<String> {
        self.translations_mapping.content_ids_up_to_date_in(language_code)
    }

    pub fn get_translated_content(
        &self,
        content_id: &str,
        language_code: &str,
    ) -> Result<&WrittenTranslation, TranslationError> {
        self.translations_mapping.get(content_id, language_code)
    }

    /// Add or replace the translation of `content_id` in `language_code`.
    pub fn add_translation(
        &mut self,
        content_id: &str,
        language_code: &str,
        translation: WrittenTranslation,
    ) -> Result<(), TranslationError> {
        translation.validate()?;
        self.translations_mapping
            .insert(content_id, language_code, translation)?;
        Ok(())
    }

    pub fn add_content_id_for_translation(&mut self, content_id: &str) -> Result<(), TranslationError> {
        self.translations_mapping.add_content_id(content_id)
    }

    pub fn delete_content_id_for_translation(
        &mut self,
        content_id: &str,
    ) -> Result<(), TranslationError> {
        self.translations_mapping.delete_content_id(content_id)
    }

    pub fn mark_written_translation_as_needing_update(
        &mut self,
        content_id: &str,
        language_code: &str,
    ) -> Result<(), TranslationError> {
        self.translations_mapping
            .mark_as_needing_update(content_id, language_code)
    }

    pub fn mark_written_translations_as_needing_update(
        &mut self,
        content_id: &str,
    ) -> Result<(), TranslationError> {
        self.translations_mapping.mark_all_as_needing_update(content_id)
    }

    /// Every html translation string, in content id then language order.
    pub fn get_all_html_content_strings(&self) -> Vec<String> {
        self.translations_mapping
            .slots()
            .values()
            .flat_map(BTreeMap::values)
            .filter(|written| written.data_format == ContentFormat::Html)
            .filter_map(|written| written.translation.as_text().map(str::to_string))
            .collect()
    }

    pub fn validate(&self, expected_content_ids: Option<&[String]>) -> Result<(), ValidationError> {
        let registry = LanguageRegistry::get();
        self.translations_mapping
            .validate("written_translations", expected_content_ids, |code| {
                registry.is_known(code)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(value: &str) -> WrittenTranslation {
        WrittenTranslation::new(ContentFormat::Html, value)
    }

    fn sample() -> WrittenTranslations {
        let mut written = WrittenTranslations::default();
        written.add_content_id_for_translation("content").unwrap();
        written.add_content_id_for_translation("hint_1").unwrap();
        written
            .add_translation("content", "hi", html("<p>Namaste</p>"))
            .unwrap();
        written
            .add_translation("hint_1", "hi", html("<p>Sanket</p>"))
            .unwrap();
        written
            .add_translation("hint_1", "es", html("<p>Pista</p>"))
            .unwrap();
        written
    }

    #[test]
    fn test_add_and_delete_content_ids() {
        let mut written = sample();
        assert_eq!(
            written.get_content_ids_for_text_translation(),
            vec!["content", "hint_1"]
        );

        let err = written.add_content_id_for_translation("content").unwrap_err();
        assert_eq!(err.to_string(), "The content_id content already exist.");

        written.delete_content_id_for_translation("hint_1").unwrap();
        let err = written.delete_content_id_for_translation("hint_1").unwrap_err();
        assert_eq!(err.to_string(), "The content_id hint_1 does not exist.");
    }

    #[test]
    fn test_add_translation_requires_content_id() {
        let mut written = sample();
        let err = written
            .add_translation("missing", "hi", html("<p>x</p>"))
            .unwrap_err();
        assert_eq!(err, TranslationError::InvalidContentId("missing".to_string()));
    }

    #[test]
    fn test_add_translation_checks_shape() {
        let mut written = sample();
        let err = written
            .add_translation(
                "content",
                "hi",
                WrittenTranslation::new(ContentFormat::Html, ContentValue::string_list(["a"])),
            )
            .unwrap_err();
        assert!(matches!(err, TranslationError::Validation(_)));
    }

    #[test]
    fn test_mark_one_language_as_needing_update() {
        let mut written = sample();
        written
            .mark_written_translation_as_needing_update("hint_1", "hi")
            .unwrap();

        assert!(written.get_translated_content("hint_1", "hi").unwrap().needs_update);
        assert!(!written.get_translated_content("hint_1", "es").unwrap().needs_update);
        assert_eq!(
            written.get_content_ids_that_are_correctly_translated("hi"),
            vec!["content"]
        );
    }

    #[test]
    fn test_mark_all_languages_as_needing_update() {
        let mut written = sample();
        written
            .mark_written_translations_as_needing_update("hint_1")
            .unwrap();
        assert!(written.get_translated_content("hint_1", "es").unwrap().needs_update);
        assert!(written.get_translated_content("hint_1", "hi").unwrap().needs_update);
        assert!(written.get_content_ids_that_are_correctly_translated("es").is_empty());
    }

    #[test]
    fn test_get_translated_content_unknown_language() {
        let err = sample().get_translated_content("content", "fr").unwrap_err();
        assert_eq!(err.to_string(), "Invalid language_code: fr");
    }

    #[test]
    fn test_html_strings() {
        let strings = sample().get_all_html_content_strings();
        assert_eq!(
            strings,
            vec!["<p>Namaste</p>", "<p>Pista</p>", "<p>Sanket</p>"]
        );
    }

    #[test]
    fn test_validate_expected_content_ids() {
        let written = sample();
        let expected = vec!["content".to_string(), "hint_1".to_string()];
        assert!(written.validate(Some(&expected)).is_ok());

        let err = written
            .validate(Some(&["content".to_string()]))
            .unwrap_err();
        assert!(err.to_string().contains("to match the listed content ids"));
    }

    #[test]
    fn test_validate_language_codes() {
        let mut slots = BTreeMap::new();
        slots.insert(
            "content".to_string(),
            BTreeMap::from([("xx".to_string(), html("<p>?</p>"))]),
        );
        let err = WrittenTranslations::new(slots).validate(None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid language_code: xx");
    }

    #[test]
    fn test_dict_form_is_nested_mapping() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value["translations_mapping"]["hint_1"]["es"]["translation"],
            "<p>Pista</p>"
        );
        let back: WrittenTranslations = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }
}
