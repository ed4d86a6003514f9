use serde::{Deserialize, Serialize};
use std::fmt;

use super::CaptionTrack;

/// Ordered language preference shared by every strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePreference {
    /// Tried first
    pub primary: String,

    /// Tried when the primary language is unavailable
    pub secondary: String,
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self {
            primary: "ko".to_string(),
            secondary: "en".to_string(),
        }
    }
}

impl LanguagePreference {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Attempt order for strategies that request one language at a time
    pub fn tiers(&self) -> Vec<LanguageTier> {
        vec![
            LanguageTier::Code(self.primary.clone()),
            LanguageTier::Code(self.secondary.clone()),
            LanguageTier::Auto,
        ]
    }
}

/// One step of a language fallback: a specific code, or whatever the platform defaults to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageTier {
    Code(String),
    Auto,
}

impl LanguageTier {
    /// `auto` is reserved for the platform default
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "" | "auto" => LanguageTier::Auto,
            code => LanguageTier::Code(code.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LanguageTier::Code(code) => code,
            LanguageTier::Auto => "auto",
        }
    }
}

impl fmt::Display for LanguageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick the primary-language track, else the secondary, else the first one.
///
/// Platform order is kept as the implicit default ranking. Returns `None`
/// only when `tracks` is empty.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    prefs: &LanguagePreference,
) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code == prefs.primary)
        .or_else(|| tracks.iter().find(|t| t.language_code == prefs.secondary))
        .or_else(|| tracks.first())
}
