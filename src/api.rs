use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument};

use crate::services::ObservationService;

#[derive(Clone)]
pub struct AppState {
    pub observation_service: ObservationService,
}

const INDEX_HTML: &str = r#"Available Routes:<br/><br/>
<table border=0>
<tr><td>Precipitation values per station per date:</td><td><a href="/api/v1.0/precipitation">/api/v1.0/precipitation</a></td></tr>
<tr><td>Stations with counts of measurements recorded:</td><td><a href="/api/v1.0/stations">/api/v1.0/stations</a></td></tr>
<tr><td>Temperature observations over the past year:</td><td><a href="/api/v1.0/tobs">/api/v1.0/tobs</a></td></tr>
<tr><td>Temperature results (min, avg, max) since provided date (yyyy-mm-dd):</td><td>/api/v1.0/&lt;start&gt;</td></tr>
<tr><td>Example:</td><td><a href="/api/v1.0/2015-01-01">/api/v1.0/2015-01-01</a></td></tr>
<tr><td>Temperature results (min, avg, max) between provided dates (yyyy-mm-dd):</td><td>/api/v1.0/&lt;start&gt;/&lt;end&gt;</td></tr>
<tr><td>Example:</td><td><a href="/api/v1.0/2015-01-01/2016-01-01">/api/v1.0/2015-01-01/2016-01-01</a></td></tr>
</table>
"#;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/v1.0/precipitation", get(get_precipitation))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/tobs", get(get_tobs))
        .route("/api/v1.0/{start}", get(get_temperature_summary))
        .route(
            "/api/v1.0/{start}/{end}",
            get(get_temperature_summary_bounded),
        )
        .with_state(state)
}

#[instrument]
async fn index() -> Html<&'static str> {
    debug!("Route index requested");
    Html(INDEX_HTML)
}

#[instrument(skip(state))]
async fn get_precipitation(
    State(state): State<AppState>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    debug!("Fetching precipitation for the past year of data");
    let result = state
        .observation_service
        .get_precipitation()
        .await
        .map_err(|e| {
            error!("Failed to fetch precipitation: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!("Retrieved precipitation for {} dates", result.len());

    Ok(Json(result))
}

#[instrument(skip(state))]
async fn get_stations(
    State(state): State<AppState>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    debug!("Fetching measurement counts per station");
    let result = state
        .observation_service
        .get_station_counts()
        .await
        .map_err(|e| {
            error!("Failed to fetch station counts: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!("Retrieved counts for {} stations", result.len());

    Ok(Json(result))
}

#[instrument(skip(state))]
async fn get_tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<(String, f64)>>, StatusCode> {
    debug!("Fetching temperature observations for the past year of data");
    let observations = state
        .observation_service
        .get_temperature_history()
        .await
        .map_err(|e| {
            error!("Failed to fetch temperature observations: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!("Retrieved {} temperature observations", observations.len());

    Ok(Json(observations))
}

type SummaryRow = (Option<f64>, Option<f64>, Option<f64>);

#[instrument(skip(state), fields(start = %start))]
async fn get_temperature_summary(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<SummaryRow>>, StatusCode> {
    debug!("Summarizing temperatures from {}", start);
    let summary = state
        .observation_service
        .get_temperature_summary(&start)
        .await
        .map_err(|e| {
            error!("Failed to summarize temperatures from {}: {}", start, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!(
        "Temperature summary from {}: min={:?} avg={:?} max={:?}",
        start, summary.min, summary.avg, summary.max
    );

    // Wire shape stays the positional [[min, avg, max]] existing clients expect
    Ok(Json(vec![(summary.min, summary.avg, summary.max)]))
}

#[instrument(skip(state), fields(start = %start, end = %end))]
async fn get_temperature_summary_bounded(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<SummaryRow>>, StatusCode> {
    debug!("Summarizing temperatures from {} to {}", start, end);
    let summary = state
        .observation_service
        .get_temperature_summary_bounded(&start, &end)
        .await
        .map_err(|e| {
            error!(
                "Failed to summarize temperatures from {} to {}: {}",
                start, end, e
            );
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!(
        "Temperature summary from {} to {}: min={:?} avg={:?} max={:?}",
        start, end, summary.min, summary.avg, summary.max
    );

    Ok(Json(vec![(summary.min, summary.avg, summary.max)]))
}
