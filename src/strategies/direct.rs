use async_trait::async_trait;
use std::sync::Arc;

use super::TranscriptStrategy;
use crate::captions::{self, LanguagePreference};
use crate::fetch::PageFetcher;
use crate::transcript::{
    AcquisitionOutcome, ProgressEvent, ProgressSink, TranscriptResult, TranscriptSource,
};
use crate::FailureReason;

/// Scrapes the public watch page for caption tracks and downloads one directly
pub struct DirectStrategy {
    fetcher: Arc<dyn PageFetcher>,
    prefs: LanguagePreference,
}

impl DirectStrategy {
    /// `fetcher` is usually a relay; any raw-body fetcher works
    pub fn new(fetcher: Arc<dyn PageFetcher>, prefs: LanguagePreference) -> Self {
        Self { fetcher, prefs }
    }

    pub async fn fetch_direct(
        &self,
        video_id: &str,
        progress: &dyn ProgressSink,
    ) -> AcquisitionOutcome {
        self.parse_transcript(video_id, progress).await.into()
    }

    async fn parse_transcript(
        &self,
        video_id: &str,
        progress: &dyn ProgressSink,
    ) -> Result<TranscriptResult, FailureReason> {
        progress.report(ProgressEvent::AnalyzingPage);
        let html = self.fetcher.fetch(&captions::watch_url(video_id)).await?;

        let tracks = captions::tracks_from_watch_page(&html)?;
        let track = captions::select_track(&tracks, &self.prefs).ok_or(FailureReason::NoCaptions)?;
        tracing::debug!(
            "Selected {} track ({}) out of {} for {}",
            track.language_code,
            track.display_name,
            tracks.len(),
            video_id
        );

        progress.report(ProgressEvent::DownloadingTrack {
            name: track.display_name.clone(),
        });
        let xml = self.fetcher.fetch(&track.source_url).await?;

        let text = captions::clean_timed_text(&xml);
        if text.is_empty() {
            return Err(FailureReason::NoCaptions);
        }

        Ok(TranscriptResult {
            text,
            language_code: track.language_code.clone(),
            source: TranscriptSource::Direct,
        })
    }
}

#[async_trait]
impl TranscriptStrategy for DirectStrategy {
    async fn acquire(&self, video_id: &str, progress: &dyn ProgressSink) -> AcquisitionOutcome {
        self.fetch_direct(video_id, progress).await
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
