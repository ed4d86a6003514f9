use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod progress;

pub use progress::{NoProgress, ProgressEvent, ProgressSink};

use crate::config::Config;
use crate::fetch::{self, HttpFetcher, PageFetcher, RelayFetcher};
use crate::strategies::{direct::DirectStrategy, server::ServerStrategy, TranscriptStrategy};
use crate::FailureReason;

/// Which strategy produced a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSource {
    Server,
    Direct,
}

impl TranscriptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptSource::Server => "server",
            TranscriptSource::Direct => "direct",
        }
    }
}

impl fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain-text transcript produced by any strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    /// Transcript prose, never empty, no markup or escaped entities
    pub text: String,

    /// Language of the track (or tier) that produced the text
    pub language_code: String,

    /// Strategy that produced the text
    pub source: TranscriptSource,
}

/// Result of one acquisition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    Success(TranscriptResult),
    Failure(FailureReason),
}

/// Message surfaced when every strategy failed
pub const GENERIC_FAILURE: &str = "failed to fetch transcript from every source";

impl AcquisitionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AcquisitionOutcome::Success(_))
    }

    /// Short status such as `success (server: ko)` or `failed`
    pub fn status_label(&self) -> String {
        match self {
            AcquisitionOutcome::Success(result) => {
                format!("success ({}: {})", result.source, result.language_code)
            }
            AcquisitionOutcome::Failure(_) => "failed".to_string(),
        }
    }

    /// Transcript text, or the generic failure message
    pub fn summary(&self) -> &str {
        match self {
            AcquisitionOutcome::Success(result) => &result.text,
            AcquisitionOutcome::Failure(_) => GENERIC_FAILURE,
        }
    }

    pub fn into_result(self) -> Result<TranscriptResult, FailureReason> {
        match self {
            AcquisitionOutcome::Success(result) => Ok(result),
            AcquisitionOutcome::Failure(reason) => Err(reason),
        }
    }
}

impl From<Result<TranscriptResult, FailureReason>> for AcquisitionOutcome {
    fn from(result: Result<TranscriptResult, FailureReason>) -> Self {
        match result {
            Ok(transcript) => AcquisitionOutcome::Success(transcript),
            Err(reason) => AcquisitionOutcome::Failure(reason),
        }
    }
}

/// Fallback orchestrator: runs each strategy in order until one succeeds
pub struct TranscriptPipeline {
    strategies: Vec<Box<dyn TranscriptStrategy>>,
}

impl TranscriptPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Server-mediated strategy first, then direct parsing, as enabled in config
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let client = fetch::build_client(&config.http).context("Failed to build HTTP client")?;
        let mut pipeline = Self::new();

        if config.server.enabled {
            pipeline.register(Box::new(ServerStrategy::new(
                client.clone(),
                &config.server.base_url,
                config.languages.clone(),
            )));
        }

        let mut fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(client));
        if config.relay.enabled {
            fetcher = Arc::new(RelayFetcher::new(config.relay.url_prefix.clone(), fetcher));
        }
        pipeline.register(Box::new(DirectStrategy::new(fetcher, config.languages.clone())));

        Ok(pipeline)
    }

    /// Append a strategy to the end of the chain
    pub fn register(&mut self, strategy: Box<dyn TranscriptStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn with_strategy(mut self, strategy: Box<dyn TranscriptStrategy>) -> Self {
        self.register(strategy);
        self
    }

    /// Strategy names in the order they run
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Acquire a transcript for `video_id`.
    ///
    /// Strategies run strictly one after another; a failure only moves the
    /// chain forward. If every strategy fails, the last failure is returned.
    pub async fn get_transcript(
        &self,
        video_id: &str,
        progress: &dyn ProgressSink,
    ) -> AcquisitionOutcome {
        let mut outcome = AcquisitionOutcome::Failure(FailureReason::Unknown(
            "no transcript strategies configured".to_string(),
        ));
        let mut previous: Option<&'static str> = None;

        for strategy in &self.strategies {
            if let Some(from) = previous {
                progress.report(ProgressEvent::FallingBack {
                    from,
                    to: strategy.name(),
                });
            }
            if let Some(event) = strategy.announce() {
                progress.report(event);
            }

            tracing::debug!("Trying {} strategy for {}", strategy.name(), video_id);
            match strategy.acquire(video_id, progress).await {
                AcquisitionOutcome::Success(result) => {
                    tracing::info!(
                        "Transcript for {} acquired via {} ({})",
                        video_id,
                        result.source,
                        result.language_code
                    );
                    return AcquisitionOutcome::Success(result);
                }
                AcquisitionOutcome::Failure(reason) => {
                    tracing::warn!("{} strategy failed for {}: {}", strategy.name(), video_id, reason);
                    previous = Some(strategy.name());
                    outcome = AcquisitionOutcome::Failure(reason);
                }
            }
        }

        outcome
    }
}

impl Default for TranscriptPipeline {
    fn default() -> Self {
        Self::new()
    }
}
