use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod selector;
pub mod timed_text;

pub use selector::{select_track, LanguagePreference, LanguageTier};
pub use timed_text::{clean_timed_text, timed_text_fragments};

use crate::FailureReason;

lazy_static! {
    static ref PLAYER_RESPONSE: Regex =
        Regex::new(r"(?s)var ytInitialPlayerResponse = (\{.*?\});").unwrap();
}

/// A caption stream offered by the platform for one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Platform language code (`ko`, `en`, `fr`, ...)
    pub language_code: String,

    /// Human-readable track name
    pub display_name: String,

    /// Timed-text document URL
    pub source_url: String,
}

/// Subset of the embedded player response that carries caption metadata
#[derive(Debug, Deserialize)]
pub struct PlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklist {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<RawCaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct RawCaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TrackName>,
}

#[derive(Debug, Deserialize)]
struct TrackName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl RawCaptionTrack {
    fn into_track(self) -> CaptionTrack {
        let display_name = self
            .name
            .and_then(|name| {
                name.simple_text.or_else(|| {
                    name.runs
                        .map(|runs| runs.into_iter().map(|run| run.text).collect::<String>())
                })
            })
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.language_code.clone());

        CaptionTrack {
            language_code: self.language_code,
            display_name,
            source_url: self.base_url,
        }
    }
}

/// Canonical watch-page URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Find and parse the `ytInitialPlayerResponse` assignment in a watch page
pub fn extract_player_response(html: &str) -> Result<PlayerResponse, FailureReason> {
    let captures = PLAYER_RESPONSE
        .captures(html)
        .ok_or_else(|| FailureReason::ParseError("player data not found".to_string()))?;

    serde_json::from_str(&captures[1]).map_err(|e| FailureReason::ParseError(e.to_string()))
}

/// Caption tracks in platform order; an absent or empty list is `NoCaptions`
pub fn caption_tracks(response: PlayerResponse) -> Result<Vec<CaptionTrack>, FailureReason> {
    let tracks: Vec<CaptionTrack> = response
        .captions
        .and_then(|c| c.tracklist)
        .and_then(|t| t.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .map(RawCaptionTrack::into_track)
        .collect();

    if tracks.is_empty() {
        return Err(FailureReason::NoCaptions);
    }

    Ok(tracks)
}

/// Convenience for both steps: watch page HTML to caption tracks
pub fn tracks_from_watch_page(html: &str) -> Result<Vec<CaptionTrack>, FailureReason> {
    caption_tracks(extract_player_response(html)?)
}
