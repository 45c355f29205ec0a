//! Languages and translation bookkeeping shared across the crate.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported content and audio languages
//! - `language`: Type-safe `Language`, validated against the registry
//! - `accents`: Voiceover language-accent master list
//! - `metrics`: Machine translation cache and provider counters
//!
//! # Example
//!
//! ```rust,ignore
//! use content_translations::i18n::{Language, LanguageRegistry, LanguageUse};
//!
//! let hindi = Language::from_code("hi", LanguageUse::Content)?;
//! assert!(LanguageRegistry::get().is_supported_audio_language_code("hi-en"));
//! ```

mod accents;
mod language;
mod metrics;
mod registry;

pub use accents::{language_accent_master_list, LanguageAccentMasterList};
pub use language::{Language, LanguageUse};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
