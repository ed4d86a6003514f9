//! Transcript Cascade - best-effort plain-text transcripts for platform videos
//!
//! A video id goes through a chain of acquisition strategies: a trusted
//! intermediary service first, then direct parsing of the public watch page
//! through a cross-origin relay. Every strategy yields the same
//! [`AcquisitionOutcome`], so callers only ever see one result shape.

pub mod captions;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod output;
pub mod server;
pub mod strategies;
pub mod transcript;
pub mod utils;

pub use captions::{CaptionTrack, LanguagePreference, LanguageTier};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use strategies::TranscriptStrategy;
pub use transcript::{
    AcquisitionOutcome, ProgressEvent, ProgressSink, TranscriptPipeline, TranscriptResult,
    TranscriptSource,
};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Why a strategy (or the whole cascade) could not produce a transcript.
///
/// Carried for diagnostics and status text only; the orchestrator never
/// branches on the variant, only on whether a strategy failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[error("no captions for this video")]
    NoCaptions,

    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("upstream rejected the request: {0}")]
    UpstreamRejected(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}
