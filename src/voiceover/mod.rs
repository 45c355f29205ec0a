//! Recorded audio and the legacy per-content translation containers.

mod audio;
mod entity;
mod mapping;
mod policy;
mod recorded;
mod written;

pub use audio::{Voiceover, ACCEPTED_AUDIO_EXTENSIONS};
pub use entity::{EntityVoiceovers, VoiceoverType, VoiceoversMapping};
pub use mapping::{ContentLanguageMap, SlotRecord};
pub use policy::{
    autogeneratable_accents, validate_language_codes_mapping, LanguageCodesMapping,
    VoiceoverAdminData,
};
pub use recorded::RecordedVoiceovers;
pub use written::{WrittenTranslation, WrittenTranslations};
