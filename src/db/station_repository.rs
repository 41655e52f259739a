use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::db::{DbError, Station};

#[derive(Clone)]
pub struct StationRepository {
    pool: SqlitePool,
}

impl StationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All stations, ordered by station code
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Station>, DbError> {
        debug!("Querying all stations");

        let stations = sqlx::query_as::<_, Station>(
            r#"
            SELECT id, station, name, latitude, longitude, elevation
            FROM station
            ORDER BY station
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} stations", stations.len());
        Ok(stations)
    }

    #[instrument(skip(self), fields(code = %code))]
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Station>, DbError> {
        debug!("Querying station by code");

        let station = sqlx::query_as::<_, Station>(
            r#"
            SELECT id, station, name, latitude, longitude, elevation
            FROM station
            WHERE station = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        if station.is_some() {
            debug!("Found station");
        } else {
            debug!("Station not found");
        }

        Ok(station)
    }
}
