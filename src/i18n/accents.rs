//! Voiceover language-accent master list.
//!
//! Every language-accent pair that voiceovers (manual or automatic) may ever
//! be recorded in, grouped by language code. The admin-editable policy in
//! `voiceover::policy` must be a subset of this list.

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// language code -> accent code -> human readable description
pub type LanguageAccentMasterList = BTreeMap<String, BTreeMap<String, String>>;

static MASTER_LIST: OnceLock<LanguageAccentMasterList> = OnceLock::new();

const ACCENTS: &[(&str, &str, &str)] = &[
    ("af", "af-ZA", "Afrikaans (South Africa)"),
    ("am", "am-ET", "Amharic (Ethiopia)"),
    ("ar", "ar-AE", "Arabic (United Arab Emirates)"),
    ("ar", "ar-EG", "Arabic (Egypt)"),
    ("ar", "ar-MA", "Arabic (Morocco)"),
    ("ar", "ar-SA", "Arabic (Saudi Arabia)"),
    ("bn", "bn-IN", "Bengali (India)"),
    ("bn", "bn-BD", "Bangla (Bangladesh)"),
    ("en", "en-US", "English (United States)"),
    ("en", "en-GB", "English (United Kingdom)"),
    ("en", "en-IN", "English (India)"),
    ("en", "en-NG", "English (Nigeria)"),
    ("es", "es-ES", "Spanish (Spain)"),
    ("es", "es-MX", "Spanish (Mexico)"),
    ("fr", "fr-FR", "French (France)"),
    ("fr", "fr-CA", "French (Canada)"),
    ("hi", "hi-IN", "Hindi (India)"),
    ("pt", "pt-BR", "Portuguese (Brazil)"),
    ("pt", "pt-PT", "Portuguese (Portugal)"),
    ("sw", "sw-KE", "Swahili (Kenya)"),
    ("sw", "sw-TZ", "Swahili (Tanzania)"),
    ("zh", "zh-CN", "Chinese (Mandarin, Simplified)"),
];

/// The master list, built once on first access.
pub fn language_accent_master_list() -> &'static LanguageAccentMasterList {
    MASTER_LIST.get_or_init(|| {
        let mut list = LanguageAccentMasterList::new();
        for (language, accent, description) in ACCENTS {
            list.entry(language.to_string())
                .or_default()
                .insert(accent.to_string(), description.to_string());
        }
        list
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_grouped_by_language() {
        let list = language_accent_master_list();
        let arabic = &list["ar"];
        assert_eq!(arabic.len(), 4);
        assert_eq!(arabic["ar-EG"], "Arabic (Egypt)");
    }

    #[test]
    fn test_every_accent_code_starts_with_its_language() {
        for (language, accents) in language_accent_master_list() {
            for accent in accents.keys() {
                assert!(
                    accent.starts_with(&format!("{}-", language)),
                    "{} is filed under {}",
                    accent,
                    language
                );
            }
        }
    }

    #[test]
    fn test_unknown_language_absent() {
        assert!(!language_accent_master_list().contains_key("xx"));
    }
}
