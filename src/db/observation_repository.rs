use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::db::{
    DailyPrecipitation, DbError, Measurement, StationMeasurementCount, TemperatureObservation,
    TemperatureSummary,
};

#[derive(Clone)]
pub struct ObservationRepository {
    pool: SqlitePool,
}

impl ObservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Most recent measurement across all stations
    #[instrument(skip(self))]
    pub async fn find_latest(&self) -> Result<Option<Measurement>, DbError> {
        debug!("Querying latest measurement");

        let measurement = sqlx::query_as::<_, Measurement>(
            r#"
            SELECT id, station, date, prcp, tobs
            FROM measurement
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(measurement)
    }

    /// Most recent measurement for a single station
    #[instrument(skip(self), fields(station = %station))]
    pub async fn find_latest_for_station(
        &self,
        station: &str,
    ) -> Result<Option<Measurement>, DbError> {
        debug!("Querying latest measurement for station");

        let measurement = sqlx::query_as::<_, Measurement>(
            r#"
            SELECT id, station, date, prcp, tobs
            FROM measurement
            WHERE station = ?1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(station)
        .fetch_optional(&self.pool)
        .await?;

        Ok(measurement)
    }

    /// Distinct precipitation values per date, for all dates on or after the
    /// cutoff. Dates compare as strings, which is sound for ISO-formatted
    /// values.
    #[instrument(skip(self))]
    pub async fn find_daily_precipitation_since(
        &self,
        cutoff: &str,
    ) -> Result<Vec<DailyPrecipitation>, DbError> {
        debug!("Querying precipitation from {}", cutoff);

        let rows = sqlx::query_as::<_, DailyPrecipitation>(
            r#"
            SELECT date, group_concat(DISTINCT prcp) AS precipitation
            FROM measurement
            WHERE date >= ?1
            GROUP BY date
            ORDER BY date
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found precipitation for {} dates", rows.len());
        Ok(rows)
    }

    /// Measurement counts per station, most active first
    #[instrument(skip(self))]
    pub async fn count_measurements_per_station(
        &self,
    ) -> Result<Vec<StationMeasurementCount>, DbError> {
        debug!("Querying measurement counts per station");

        let rows = sqlx::query_as::<_, StationMeasurementCount>(
            r#"
            SELECT station, COUNT(*) AS measurement_count
            FROM measurement
            GROUP BY station
            ORDER BY measurement_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} stations with measurements", rows.len());
        Ok(rows)
    }

    /// Total rows in the measurement table
    #[instrument(skip(self))]
    pub async fn count_measurements(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Temperature observations for one station from the cutoff onward,
    /// ascending by date
    #[instrument(skip(self), fields(station = %station))]
    pub async fn find_temperatures_for_station_since(
        &self,
        station: &str,
        cutoff: &str,
    ) -> Result<Vec<TemperatureObservation>, DbError> {
        debug!("Querying temperatures for station from {}", cutoff);

        let rows = sqlx::query_as::<_, TemperatureObservation>(
            r#"
            SELECT date, tobs
            FROM measurement
            WHERE station = ?1 AND date >= ?2
            ORDER BY date
            "#,
        )
        .bind(station)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} temperature observations", rows.len());
        Ok(rows)
    }

    /// Min/avg/max temperature for all measurements on or after `start`.
    /// Aggregates over an empty set come back as nulls, not an error.
    #[instrument(skip(self))]
    pub async fn summarize_temperatures_since(
        &self,
        start: &str,
    ) -> Result<TemperatureSummary, DbError> {
        debug!("Summarizing temperatures from {}", start);

        let summary = sqlx::query_as::<_, TemperatureSummary>(
            r#"
            SELECT MIN(tobs) AS min, AVG(tobs) AS avg, MAX(tobs) AS max
            FROM measurement
            WHERE date >= ?1
            "#,
        )
        .bind(start)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Min/avg/max temperature for measurements between `start` and `end`
    /// inclusive
    #[instrument(skip(self))]
    pub async fn summarize_temperatures_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, DbError> {
        debug!("Summarizing temperatures from {} to {}", start, end);

        let summary = sqlx::query_as::<_, TemperatureSummary>(
            r#"
            SELECT MIN(tobs) AS min, AVG(tobs) AS avg, MAX(tobs) AS max
            FROM measurement
            WHERE date >= ?1 AND date <= ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}
