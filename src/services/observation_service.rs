use chrono::{Duration, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;

use crate::db::{DbError, ObservationRepository, TemperatureSummary};

/// Station whose history the temperature-observation route reports; the most
/// active station in the dataset.
pub const TOBS_STATION: &str = "USC00519281";

#[derive(Clone)]
pub struct ObservationService {
    observation_repo: ObservationRepository,
}

impl ObservationService {
    pub fn new(observation_repo: ObservationRepository) -> Self {
        Self { observation_repo }
    }

    /// Distinct precipitation values per date over the past year of data
    ///
    /// Each date maps to a singleton list holding the comma-joined distinct
    /// precipitation values reported across stations that day.
    pub async fn get_precipitation(&self) -> Result<Map<String, Value>, DbError> {
        // The store's actual latest date is logged for operators; the
        // reporting window stays pinned to the reference date below.
        if let Some(latest) = self.observation_repo.find_latest().await? {
            debug!("Latest measurement date in store: {}", latest.date);
        }

        let cutoff = Self::precipitation_cutoff().to_string();
        debug!("Precipitation cutoff date: {}", cutoff);

        let rows = self
            .observation_repo
            .find_daily_precipitation_since(&cutoff)
            .await?;

        let mut result = Map::new();
        for row in rows {
            let joined = row.precipitation.map(Value::String).unwrap_or(Value::Null);
            result.insert(row.date, Value::Array(vec![joined]));
        }
        Ok(result)
    }

    /// Measurement counts keyed by station code
    pub async fn get_station_counts(&self) -> Result<Map<String, Value>, DbError> {
        let rows = self
            .observation_repo
            .count_measurements_per_station()
            .await?;

        let mut result = Map::new();
        for row in rows {
            result.insert(row.station, Value::from(row.measurement_count));
        }
        Ok(result)
    }

    /// Past year of (date, temperature) pairs for the fixed station,
    /// ascending by date
    pub async fn get_temperature_history(&self) -> Result<Vec<(String, f64)>, DbError> {
        if let Some(latest) = self
            .observation_repo
            .find_latest_for_station(TOBS_STATION)
            .await?
        {
            debug!("Latest measurement date for {}: {}", TOBS_STATION, latest.date);
        }

        let cutoff = Self::tobs_cutoff().to_string();
        debug!("Temperature cutoff date: {}", cutoff);

        let rows = self
            .observation_repo
            .find_temperatures_for_station_since(TOBS_STATION, &cutoff)
            .await?;

        Ok(rows.into_iter().map(|obs| (obs.date, obs.tobs)).collect())
    }

    /// Min/avg/max temperature from `start` onward
    ///
    /// The date string is not validated; a malformed value matches no rows
    /// and the summary comes back all-null.
    pub async fn get_temperature_summary(&self, start: &str) -> Result<TemperatureSummary, DbError> {
        self.observation_repo
            .summarize_temperatures_since(start)
            .await
    }

    /// Min/avg/max temperature between `start` and `end` inclusive
    pub async fn get_temperature_summary_bounded(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, DbError> {
        self.observation_repo
            .summarize_temperatures_between(start, end)
            .await
    }

    // Reporting-window cutoffs (private)
    //
    // Both windows are pinned one year back from the dataset's last known
    // dates. The two routes were pinned on different days; the constants are
    // kept verbatim so responses stay stable for existing clients.

    fn precipitation_cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 8, 23).unwrap() - Duration::days(365)
    }

    fn tobs_cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 8, 18).unwrap() - Duration::days(365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precipitation_cutoff() {
        assert_eq!(
            ObservationService::precipitation_cutoff(),
            NaiveDate::from_ymd_opt(2016, 8, 23).unwrap()
        );
    }

    #[test]
    fn test_tobs_cutoff() {
        assert_eq!(
            ObservationService::tobs_cutoff(),
            NaiveDate::from_ymd_opt(2016, 8, 18).unwrap()
        );
    }
}
