use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use log::info;
use serde::Deserialize;
use tower_http::services::{ServeDir, ServeFile};

use crate::pipeline::{BatchResponse, Pipeline};
use crate::youtube::TranscriptProvider;

/// Body of `POST /summarize`
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub video_ids: Vec<String>,
    pub languages: Option<Vec<String>>,
    pub translate: Option<String>,
}

pub struct AppState<P> {
    pub pipeline: Pipeline<P>,
    pub default_languages: Vec<String>,
    pub default_translate: String,
}

/// Routes: landing page at `/`, assets under `/static`, and `POST /summarize`
pub fn router<P>(state: Arc<AppState<P>>, static_dir: &Path) -> Router
where
    P: TranscriptProvider + Send + Sync + 'static,
{
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/summarize", post(summarize::<P>))
        .with_state(state)
}

async fn summarize<P>(State(state): State<Arc<AppState<P>>>, Json(request): Json<SummarizeRequest>) -> Json<BatchResponse>
where
    P: TranscriptProvider + Send + Sync + 'static,
{
    let languages = request
        .languages
        .filter(|langs| !langs.is_empty())
        .unwrap_or_else(|| state.default_languages.clone());
    let translate = request
        .translate
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| state.default_translate.clone());

    info!(
        "Summarize request: {} video(s), languages={languages:?}, translate={translate}",
        request.video_ids.len()
    );

    let response = state
        .pipeline
        .run_batch(&request.video_ids, &languages, &translate)
        .await;
    Json(response)
}
