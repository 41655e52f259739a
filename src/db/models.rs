use serde::Serialize;
use sqlx::FromRow;

// Database entity models
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Station {
    pub id: i64,
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Measurement {
    pub id: i64,
    pub station: String,
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: f64,
}

// Query row types (named records for otherwise anonymous aggregate rows)

/// Distinct precipitation values observed on one date, comma-joined by the
/// store's group_concat. Null when every station's reading for the date was
/// itself null.
#[derive(Debug, Clone, FromRow)]
pub struct DailyPrecipitation {
    pub date: String,
    pub precipitation: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StationMeasurementCount {
    pub station: String,
    pub measurement_count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

/// Min/avg/max over a filtered set of temperature observations. All fields
/// are null when the filter matched no rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemperatureSummary {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}
