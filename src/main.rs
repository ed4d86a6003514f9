use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_cascade::cli::{Cli, Commands};
use transcript_cascade::config::Config;
use transcript_cascade::fetch::{self, HttpFetcher};
use transcript_cascade::server::{self, WatchPageSource};
use transcript_cascade::transcript::{AcquisitionOutcome, TranscriptPipeline};
use transcript_cascade::{output, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the transcript itself
    let default_filter = if cli.verbose {
        "transcript_cascade=debug"
    } else {
        "transcript_cascade=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load().await?;

    match cli.command {
        Commands::Fetch {
            video,
            output,
            format,
            server_url,
            no_server,
            no_relay,
        } => {
            let video_id = utils::parse_video_id(&video)?;

            if let Some(url) = server_url {
                config.server.base_url = url;
            }
            if no_server {
                config.server.enabled = false;
            }
            if no_relay {
                config.relay.enabled = false;
            }
            config.validate()?;

            let pipeline = TranscriptPipeline::from_config(&config)?;
            tracing::info!(
                "Fetching transcript for {} via {}",
                video_id,
                pipeline.strategy_names().join(" -> ")
            );

            let progress = if cli.quiet {
                ProgressBar::hidden()
            } else {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
                );
                spinner.enable_steady_tick(Duration::from_millis(100));
                spinner
            };

            let outcome = pipeline.get_transcript(&video_id, &progress).await;
            progress.finish_and_clear();

            let status = outcome.status_label();
            match outcome {
                AcquisitionOutcome::Success(result) => {
                    match output {
                        Some(path) => {
                            output::save_to_file(&result, &path, &format).await?;
                            println!("Transcript saved to: {}", path.display());
                        }
                        None => {
                            output::print_to_console(&result, &format)?;
                        }
                    }
                    eprintln!("{}", style(status).green());
                }
                AcquisitionOutcome::Failure(ref reason) => {
                    tracing::debug!("Last failure for {}: {}", video_id, reason);
                    eprintln!("{}", style(&status).red());
                    anyhow::bail!("{}", outcome.summary());
                }
            }
        }
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(config.serve.bind);
            let client = fetch::build_client(&config.http)?;
            let source = WatchPageSource::new(Arc::new(HttpFetcher::new(client)));

            server::serve(addr, Arc::new(source), config.languages.clone()).await?;
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.save().await?;
                println!("Configuration written to: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
