//! Admin-editable voiceover policy.
//!
//! The policy records, per language, which accents voiceovers are offered in
//! and whether each accent supports automatic generation. It must stay a
//! subset of the language-accent master list.

use crate::error::{invalid, ValidationError};
use crate::i18n::{language_accent_master_list, LanguageAccentMasterList};
use serde::Serialize;
use std::collections::BTreeMap;

/// language code -> accent code -> autogeneration supported
pub type LanguageCodesMapping = BTreeMap<String, BTreeMap<String, bool>>;

/// Data shown on the voiceover admin page.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceoverAdminData {
    pub language_accent_master_list: LanguageAccentMasterList,
    pub language_codes_mapping: LanguageCodesMapping,
}

impl VoiceoverAdminData {
    pub fn new(language_codes_mapping: LanguageCodesMapping) -> Self {
        Self {
            language_accent_master_list: language_accent_master_list().clone(),
            language_codes_mapping,
        }
    }
}

pub fn validate_language_codes_mapping(mapping: &LanguageCodesMapping) -> Result<(), ValidationError> {
    let master_list = language_accent_master_list();
    for (language_code, accents) in mapping {
        let Some(known_accents) = master_list.get(language_code) else {
            invalid!(
                "Language code {} is not present in the language accent master list",
                language_code
            );
        };
        for accent_code in accents.keys() {
            if !known_accents.contains_key(accent_code) {
                invalid!(
                    "Language accent code {} is not present in the language \
                     accent master list for {}",
                    accent_code,
                    language_code
                );
            }
        }
    }
    Ok(())
}

/// Accent codes that support automatic voiceover generation.
pub fn autogeneratable_accents(mapping: &LanguageCodesMapping) -> Vec<String> {
    mapping
        .values()
        .flat_map(|accents| accents.iter())
        .filter(|(_, supported)| **supported)
        .map(|(accent, _)| accent.clone())
        .collect()
}
