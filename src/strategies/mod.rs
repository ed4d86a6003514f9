use async_trait::async_trait;
use std::future::Future;

pub mod direct;
pub mod server;

use crate::captions::LanguageTier;
use crate::transcript::{AcquisitionOutcome, ProgressEvent, ProgressSink};
use crate::FailureReason;

/// One self-contained way of acquiring a transcript
#[async_trait]
pub trait TranscriptStrategy: Send + Sync {
    /// Run the strategy to completion; failures come back as data, never as errors
    async fn acquire(&self, video_id: &str, progress: &dyn ProgressSink) -> AcquisitionOutcome;

    /// Short name used in logs, progress and status text
    fn name(&self) -> &'static str;

    /// Event reported by the orchestrator right before this strategy starts
    fn announce(&self) -> Option<ProgressEvent> {
        None
    }
}

/// A language tier that did not produce a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFailure {
    pub tier: LanguageTier,
    pub reason: FailureReason,
}

/// Run `attempt` for each tier in order and return the first success.
///
/// Attempts are independent: a failure is recorded and the next tier runs.
/// When every tier fails, all failures are returned in attempt order.
pub async fn first_success<T, F, Fut>(
    tiers: Vec<LanguageTier>,
    mut attempt: F,
) -> Result<(LanguageTier, T), Vec<TierFailure>>
where
    F: FnMut(LanguageTier) -> Fut,
    Fut: Future<Output = Result<T, FailureReason>>,
{
    let mut failures = Vec::with_capacity(tiers.len());

    for tier in tiers {
        match attempt(tier.clone()).await {
            Ok(value) => return Ok((tier, value)),
            Err(reason) => {
                tracing::debug!("Language tier {} failed: {}", tier, reason);
                failures.push(TierFailure { tier, reason });
            }
        }
    }

    Err(failures)
}
