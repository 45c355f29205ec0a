use crate::error::{invalid, ValidationError};
use serde::{Deserialize, Serialize};

/// Audio file extensions a voiceover may be uploaded as.
pub const ACCEPTED_AUDIO_EXTENSIONS: &[&str] = &["mp3"];

/// One recorded audio file for a piece of content in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voiceover {
    pub filename: String,
    pub file_size_bytes: i64,
    #[serde(default)]
    pub needs_update: bool,
    pub duration_secs: f64,
}

impl Voiceover {
    pub fn new(filename: impl Into<String>, file_size_bytes: i64, duration_secs: f64) -> Self {
        Self {
            filename: filename.into(),
            file_size_bytes,
            needs_update: false,
            duration_secs,
        }
    }

    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let extension = match self.filename.rfind('.') {
            None | Some(0) => invalid!("Invalid audio filename: {}", self.filename),
            Some(dot) => &self.filename[dot + 1..],
        };
        if !ACCEPTED_AUDIO_EXTENSIONS.contains(&extension) {
            invalid!(
                "Invalid audio filename: it should have one of the following \
                 extensions: {:?}. Received: {}",
                ACCEPTED_AUDIO_EXTENSIONS,
                self.filename
            );
        }
        if self.file_size_bytes <= 0 {
            invalid!("Invalid file size: {}", self.file_size_bytes);
        }
        if !(self.duration_secs >= 0.0) {
            invalid!(
                "Expected duration_secs to be positive number, or zero if not \
                 yet specified {}",
                self.duration_secs
            );
        }
        Ok(())
    }
}
