use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::clients::{
    CatalogProvider, SearchFilter, StreamResolver, YtDlpResolver, YtMusicClient,
    entities::TrackRecord,
    errors::{Error, Result},
    stream::AudioQuality,
};
use crate::config::Config;

/// Most results `GET /search` returns, in provider order.
pub const MAX_RESULTS: usize = 10;

/// Providers shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub resolver: Arc<dyn StreamResolver>,
    pub quality: AudioQuality,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogProvider>, resolver: Arc<dyn StreamResolver>) -> Self {
        AppState {
            catalog,
            resolver,
            quality: AudioQuality::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = YtMusicClient::with_base_url(&config.catalog_url)?;
        let resolver = YtDlpResolver::new(config.ytdlp_path.clone());
        Ok(AppState {
            catalog: Arc::new(catalog),
            resolver: Arc::new(resolver),
            quality: config.quality,
        })
    }
}

/// Query string pairs in request order; repeated keys are kept.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(pub Vec<(String, String)>);

impl QueryParams {
    // First `query` value wins. Only an absent or empty value is rejected;
    // whitespace counts as a query
    fn require(self) -> Result<String, ApiError> {
        self.0
            .into_iter()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| value)
            .filter(|q| !q.is_empty())
            .ok_or(ApiError::MissingQuery)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<TrackRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreamUrlResponse {
    pub success: bool,
    pub stream_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    MissingQuery,
    NoSongFound,
    Upstream(Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingQuery => (StatusCode::BAD_REQUEST, "Missing query".to_string()),
            ApiError::NoSongFound => (StatusCode::NOT_FOUND, "No song found".to_string()),
            ApiError::Upstream(e) => {
                warn!("Upstream provider failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
        });
        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Upstream(err)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search_songs))
        .route("/stream-url", get(get_stream_url))
        .with_state(state)
}

async fn search_songs(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.require()?;
    info!("GET /search query={query:?}");

    let tracks = state.catalog.search(&query, SearchFilter::Songs).await?;
    let results = tracks
        .into_iter()
        .take(MAX_RESULTS)
        .map(TrackRecord::from)
        .collect();

    Ok(Json(SearchResponse {
        success: true,
        results,
    }))
}

async fn get_stream_url(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<StreamUrlResponse>, ApiError> {
    let query = params.require()?;
    info!("GET /stream-url query={query:?}");

    let best = state
        .catalog
        .search(&query, SearchFilter::Songs)
        .await?
        .into_iter()
        .next()
        .ok_or(ApiError::NoSongFound)?;

    let video_id = best.video_id.ok_or_else(|| {
        Error::MissingTrackId(best.title.unwrap_or_else(|| "<untitled>".to_string()))
    })?;
    let stream_url = state.resolver.resolve(&video_id, state.quality).await?;

    Ok(Json(StreamUrlResponse {
        success: true,
        stream_url,
    }))
}

pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let addr = config.socket_addr()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
