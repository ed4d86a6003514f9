use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::captions::{self, LanguagePreference, LanguageTier};
use crate::fetch::PageFetcher;
use crate::strategies::first_success;
use crate::FailureReason;

/// Produces per-line caption fragments for one language tier
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fragments(
        &self,
        video_id: &str,
        tier: LanguageTier,
    ) -> Result<Vec<String>, FailureReason>;
}

/// Reads caption tracks straight from the watch page, no relay involved
pub struct WatchPageSource {
    fetcher: Arc<dyn PageFetcher>,
}

impl WatchPageSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl CaptionSource for WatchPageSource {
    async fn fragments(
        &self,
        video_id: &str,
        tier: LanguageTier,
    ) -> Result<Vec<String>, FailureReason> {
        let html = self.fetcher.fetch(&captions::watch_url(video_id)).await?;
        let tracks = captions::tracks_from_watch_page(&html)?;

        let track = match &tier {
            LanguageTier::Code(code) => tracks.iter().find(|t| &t.language_code == code),
            LanguageTier::Auto => tracks.first(),
        }
        .ok_or(FailureReason::NoCaptions)?;

        let xml = self.fetcher.fetch(&track.source_url).await?;
        let fragments = captions::timed_text_fragments(&xml);
        if fragments.is_empty() {
            return Err(FailureReason::NoCaptions);
        }

        Ok(fragments)
    }
}

#[derive(Clone)]
struct AppState {
    source: Arc<dyn CaptionSource>,
    prefs: LanguagePreference,
}

#[derive(Debug, Deserialize)]
struct TranscriptQuery {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
    lang: Option<String>,
}

/// Router exposing `GET /transcript?videoId=<id>[&lang=<code|auto>]`
pub fn router(source: Arc<dyn CaptionSource>, prefs: LanguagePreference) -> Router {
    Router::new()
        .route("/transcript", get(get_transcript))
        .with_state(AppState { source, prefs })
}

/// Bind and serve until Ctrl+C
pub async fn serve(
    addr: SocketAddr,
    source: Arc<dyn CaptionSource>,
    prefs: LanguagePreference,
) -> crate::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    tracing::info!("Transcript endpoint listening on http://{}/transcript", addr);

    axum::serve(listener, router(source, prefs))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running transcript server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", err);
    }
}

async fn get_transcript(
    State(state): State<AppState>,
    Query(query): Query<TranscriptQuery>,
) -> Response {
    let Some(video_id) = query.video_id.filter(|id| !id.trim().is_empty()) else {
        return reply(StatusCode::BAD_REQUEST, json!({ "error": "Video ID required" }));
    };

    // An explicit lang pins a single tier; otherwise run the whole cascade.
    let tiers = match query.lang.as_deref() {
        Some(label) => vec![LanguageTier::parse(label)],
        None => state.prefs.tiers(),
    };

    let source = &state.source;
    let attempts = first_success(tiers, |tier| {
        let video_id = video_id.as_str();
        async move { source.fragments(video_id, tier).await }
    });

    match attempts.await {
        Ok((tier, fragments)) => {
            tracing::info!("Served {} transcript for {}", tier, video_id);
            reply(
                StatusCode::OK,
                json!({
                    "success": true,
                    "transcript": fragments.join(" "),
                    "lang": tier.label(),
                }),
            )
        }
        Err(failures) => {
            for failure in &failures {
                tracing::warn!("{} tier failed for {}: {}", failure.tier, video_id, failure.reason);
            }
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": "Failed to fetch transcript" }),
            )
        }
    }
}

fn reply(status: StatusCode, body: serde_json::Value) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(body),
    )
        .into_response()
}
