use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcript",
    about = "Transcript Cascade - Recover plain-text video transcripts with graceful fallbacks",
    version,
    long_about = "Fetches a best-effort transcript for a video: first through a transcript service, then by parsing the public watch page through a cross-origin relay. Can also run the transcript service itself."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the transcript of a video
    Fetch {
        /// Video id or watch URL
        #[arg(value_name = "VIDEO")]
        video: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Transcript service base URL (overrides config)
        #[arg(long, value_name = "URL", env = "TRANSCRIPT_SERVER_URL")]
        server_url: Option<String>,

        /// Skip the transcript service and parse the page directly
        #[arg(long)]
        no_server: bool,

        /// Fetch the platform without the cross-origin relay
        #[arg(long)]
        no_relay: bool,
    },

    /// Run the transcript service (GET /transcript?videoId=<id>)
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },

    /// Show or write the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON with language and source
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
