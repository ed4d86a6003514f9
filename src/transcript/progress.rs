use indicatif::ProgressBar;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Discrete progress steps emitted while acquiring a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// About to ask the intermediary service
    RequestingServer,

    /// A strategy failed and the next one takes over
    FallingBack {
        from: &'static str,
        to: &'static str,
    },

    /// Fetching and scanning the watch page
    AnalyzingPage,

    /// Downloading the timed-text document of the selected track
    DownloadingTrack { name: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::RequestingServer => write!(f, "requesting server..."),
            ProgressEvent::FallingBack { from, to } => {
                write!(f, "{} failed, switching to {}...", from, to)
            }
            ProgressEvent::AnalyzingPage => write!(f, "analyzing video page data..."),
            ProgressEvent::DownloadingTrack { name } => {
                write!(f, "downloading captions ({})...", name)
            }
        }
    }
}

/// Fire-and-forget receiver of progress events; the caller decides how to render them
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}

impl ProgressSink for UnboundedSender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) {
        // A dropped receiver just means nobody is watching anymore.
        let _ = self.send(event);
    }
}

impl ProgressSink for ProgressBar {
    fn report(&self, event: ProgressEvent) {
        self.set_message(event.to_string());
    }
}
