//! HTTP API
//!
//! `POST /search` streams progress as server-sent events. Every event is a
//! single `data:` line; the stream ends with `SEARCH_COMPLETE:<json>` or
//! `ERROR:<message>`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        Json,
        sse::{Event, Sse},
    },
    routing::{get, post},
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info, warn};

use crate::campgrounds::load_campgrounds;
use crate::config::{HomeConfig, Settings, resolve_home};
use crate::finder::{ChannelSink, SummerDayFinder};
use crate::models::SearchParameters;
use crate::weather::{GeocodingResult, WeatherClient};

/// Prefix of the final event of a successful search
pub const SEARCH_COMPLETE: &str = "SEARCH_COMPLETE:";
/// Prefix of the final event of a failed search
pub const SEARCH_ERROR: &str = "ERROR:";

/// Shared state behind every handler
pub struct AppState {
    pub settings: Settings,
    pub weather: WeatherClient,
}

impl AppState {
    pub fn new(settings: Settings) -> crate::Result<Self> {
        let weather = WeatherClient::new(&settings.weather)?;
        Ok(Self { settings, weather })
    }
}

/// Search request body; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub max_miles: Option<f64>,
    pub min_high_temp: Option<f64>,
    pub max_high_temp: Option<f64>,
    pub home_lat: Option<f64>,
    pub home_long: Option<f64>,
    #[serde(default)]
    pub prefer_waterfront: bool,
    #[serde(default)]
    pub all_days: bool,
}

impl SearchRequest {
    pub fn parameters(&self) -> SearchParameters {
        let defaults = SearchParameters::default();
        SearchParameters {
            max_miles: self.max_miles.unwrap_or(defaults.max_miles),
            min_high_temp: self.min_high_temp.unwrap_or(defaults.min_high_temp),
            max_high_temp: self.max_high_temp.unwrap_or(defaults.max_high_temp),
            prefer_waterfront: self.prefer_waterfront,
            weekends_only: !self.all_days,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    name: String,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", post(search))
        .route("/config", get(get_config))
        .route("/geocode", get(geocode))
        .route("/health", get(health))
        .with_state(state)
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(run_search(state, request, tx));

    let events = stream::unfold(rx, |mut rx| async move {
        let message = rx.recv().await?;
        Some((Ok(Event::default().data(message)), rx))
    });
    Sse::new(events)
}

/// Run one search, forwarding every message to `tx`.
///
/// Send failures mean the client went away; the search still runs to the end.
async fn run_search(state: Arc<AppState>, request: SearchRequest, tx: UnboundedSender<String>) {
    let server = &state.settings.server;

    let campgrounds = match load_campgrounds(&server.campgrounds_file) {
        Ok(campgrounds) => campgrounds,
        Err(e) => {
            error!("{e}");
            let _ = tx.send(format!("{SEARCH_ERROR}{e}"));
            return;
        }
    };
    let config = match HomeConfig::load(&server.config_file) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            let _ = tx.send(format!("{SEARCH_ERROR}{e}"));
            return;
        }
    };

    let home = resolve_home(request.home_lat, request.home_long, &config);
    let params = request.parameters();
    let finder = SummerDayFinder::new(state.weather.clone());

    let mut sink = ChannelSink::new(tx.clone());
    let summer_days = finder
        .search(&campgrounds, &params, home.as_ref(), &mut sink)
        .await;

    let terminal = match serde_json::to_string(&summer_days) {
        Ok(json) => format!("{SEARCH_COMPLETE}{json}"),
        Err(e) => format!("{SEARCH_ERROR}{e}"),
    };
    if tx.send(terminal).is_err() {
        info!("Client disconnected before the search finished");
    }
}

async fn get_config(State(state): State<Arc<AppState>>) -> Result<Json<HomeConfig>, StatusCode> {
    HomeConfig::load(&state.settings.server.config_file)
        .map(Json)
        .map_err(|e| {
            error!("{e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<Vec<GeocodingResult>>, StatusCode> {
    let name = query.name.trim();
    if name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    state.weather.geocode(name).await.map(Json).map_err(|e| {
        warn!("{e}");
        StatusCode::BAD_GATEWAY
    })
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::VERSION,
    })
}
