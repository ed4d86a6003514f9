use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{first_success, TranscriptStrategy};
use crate::captions::{LanguagePreference, LanguageTier};
use crate::transcript::{
    AcquisitionOutcome, ProgressEvent, ProgressSink, TranscriptResult, TranscriptSource,
};
use crate::FailureReason;

/// Body of `GET /transcript`
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    success: bool,
    transcript: Option<String>,
    lang: Option<String>,
    error: Option<String>,
}

/// Asks the trusted intermediary service, one language tier per request
///
/// Every request pins its tier with `lang`. A service that ignores `lang`
/// and runs its own ko -> en -> auto cascade on each call still answers
/// correctly, but a total failure then costs up to nine upstream lookups
/// instead of three.
pub struct ServerStrategy {
    client: Client,
    endpoint: String,
    prefs: LanguagePreference,
}

impl ServerStrategy {
    /// `base_url` is where the service mounts `/transcript`
    pub fn new(client: Client, base_url: &str, prefs: LanguagePreference) -> Self {
        Self {
            client,
            endpoint: format!("{}/transcript", base_url.trim_end_matches('/')),
            prefs,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Try primary, secondary, then default captions; the first success wins
    pub async fn fetch_via_server(&self, video_id: &str) -> AcquisitionOutcome {
        let attempts = first_success(self.prefs.tiers(), |tier| self.request_tier(video_id, tier));

        match attempts.await {
            Ok((_, result)) => AcquisitionOutcome::Success(result),
            Err(failures) => {
                tracing::debug!("Server attempts for {}: {:?}", video_id, failures);
                AcquisitionOutcome::Failure(FailureReason::UpstreamRejected(format!(
                    "all {} language tiers failed",
                    failures.len()
                )))
            }
        }
    }

    async fn request_tier(
        &self,
        video_id: &str,
        tier: LanguageTier,
    ) -> Result<TranscriptResult, FailureReason> {
        tracing::debug!("Requesting {} transcript for {} from {}", tier, video_id, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("videoId", video_id), ("lang", tier.label())])
            .send()
            .await
            .map_err(|e| FailureReason::UpstreamUnreachable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FailureReason::UpstreamRejected(format!("HTTP {}", status)));
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| FailureReason::ParseError(e.to_string()))?;

        if !body.success {
            return Err(FailureReason::UpstreamRejected(
                body.error
                    .unwrap_or_else(|| "server reported failure".to_string()),
            ));
        }

        let text = body
            .transcript
            .filter(|text| !text.trim().is_empty())
            .ok_or(FailureReason::NoCaptions)?;

        Ok(TranscriptResult {
            text,
            language_code: body.lang.unwrap_or_else(|| tier.label().to_string()),
            source: TranscriptSource::Server,
        })
    }
}

#[async_trait]
impl TranscriptStrategy for ServerStrategy {
    async fn acquire(&self, video_id: &str, _progress: &dyn ProgressSink) -> AcquisitionOutcome {
        self.fetch_via_server(video_id).await
    }

    fn name(&self) -> &'static str {
        "server"
    }

    fn announce(&self) -> Option<ProgressEvent> {
        Some(ProgressEvent::RequestingServer)
    }
}
