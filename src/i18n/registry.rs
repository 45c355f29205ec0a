//! Language registry: Single source of truth for all supported languages.
//!
//! Content may be written and translated in any language listed here with
//! `supports_content`, and voiceovers may be recorded in any language with
//! `supports_audio`. The registry is a process-wide singleton built once with
//! `OnceLock`.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language code (e.g., "en", "pt", "hi-en")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Portuguese")
    pub name: &'static str,

    /// Whether this is the canonical/source language (only one should be true)
    pub is_canonical: bool,

    /// Whether lesson content can be written and translated in this language
    pub supports_content: bool,

    /// Whether voiceovers can be recorded in this language
    pub supports_audio: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All languages in which content can be translated.
    pub fn list_content_languages(&self) -> Vec<&LanguageConfig> {
        self.languages
            .iter()
            .filter(|lang| lang.supports_content)
            .collect()
    }

    /// All languages in which voiceovers can be recorded.
    pub fn list_audio_languages(&self) -> Vec<&LanguageConfig> {
        self.languages
            .iter()
            .filter(|lang| lang.supports_audio)
            .collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one canonical language
    /// (a configuration error in `default_languages`).
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Whether `code` is a language content can be written in.
    pub fn is_valid_language_code(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.supports_content)
            .unwrap_or(false)
    }

    /// Whether `code` is a language voiceovers can be recorded in.
    pub fn is_supported_audio_language_code(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.supports_audio)
            .unwrap_or(false)
    }

    /// Whether `code` is known for either content or audio.
    pub fn is_known(&self, code: &str) -> bool {
        self.is_valid_language_code(code) || self.is_supported_audio_language_code(code)
    }
}

fn lang(
    code: &'static str,
    name: &'static str,
    supports_content: bool,
    supports_audio: bool,
) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        is_canonical: false,
        supports_content,
        supports_audio,
    }
}

/// Default language configurations.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            is_canonical: true,
            supports_content: true,
            supports_audio: true,
        },
        lang("ar", "Arabic", true, true),
        lang("bn", "Bangla", true, true),
        lang("es", "Spanish", true, true),
        lang("fr", "French", true, true),
        lang("hi", "Hindi", true, true),
        lang("pt", "Portuguese", true, true),
        lang("pcm", "Nigerian Pidgin", true, true),
        lang("sw", "Swahili", true, true),
        lang("zh", "Chinese", true, true),
        lang("id", "Bahasa Indonesia", true, true),
        lang("tr", "Turkish", true, true),
        lang("vi", "Vietnamese", true, true),
        // Audio-only variants.
        lang("hi-en", "Hinglish", false, true),
        lang("bn-IN", "Bangla (India)", false, true),
        // Content-only.
        lang("ha", "Hausa", true, false),
        lang("ig", "Igbo", true, false),
        lang("yo", "Yoruba", true, false),
    ]
}
