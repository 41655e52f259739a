// Repository-level tests against an in-memory SQLite store

use climate_observation_service::db::ObservationRepository;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn insert_measurement(
    pool: &SqlitePool,
    station: &str,
    date: &str,
    prcp: Option<f64>,
    tobs: f64,
) {
    sqlx::query(
        r#"
        INSERT INTO measurement (station, date, prcp, tobs)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(station)
    .bind(date)
    .bind(prcp)
    .bind(tobs)
    .execute(pool)
    .await
    .expect("Failed to insert test measurement");
}

#[tokio::test]
async fn test_find_latest_measurement() {
    let pool = setup_test_db().await;
    let repo = ObservationRepository::new(pool.clone());

    assert!(repo.find_latest().await.unwrap().is_none());

    insert_measurement(&pool, "USC00511111", "2017-08-20", Some(0.0), 75.0).await;
    insert_measurement(&pool, "USC00522222", "2017-08-23", Some(0.1), 76.0).await;
    insert_measurement(&pool, "USC00511111", "2016-01-01", Some(0.2), 70.0).await;

    let latest = repo.find_latest().await.unwrap().unwrap();
    assert_eq!(latest.date, "2017-08-23");
    assert_eq!(latest.station, "USC00522222");
    assert_eq!(latest.prcp, Some(0.1));
    assert_eq!(latest.tobs, 76.0);

    let latest = repo
        .find_latest_for_station("USC00511111")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.date, "2017-08-20");

    assert!(repo
        .find_latest_for_station("USC00599999")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_summary_min_avg_max_ordering() {
    let pool = setup_test_db().await;
    let repo = ObservationRepository::new(pool.clone());

    for (date, tobs) in [
        ("2016-01-01", 62.0),
        ("2016-02-01", 71.0),
        ("2016-03-01", 68.0),
        ("2016-04-01", 77.0),
    ] {
        insert_measurement(&pool, "USC00511111", date, None, tobs).await;
    }

    let summary = repo.summarize_temperatures_since("2016-01-01").await.unwrap();
    let (min, avg, max) = (
        summary.min.unwrap(),
        summary.avg.unwrap(),
        summary.max.unwrap(),
    );

    assert!(min <= avg && avg <= max);
    assert_eq!(min, 62.0);
    assert_eq!(max, 77.0);
    assert!((avg - 69.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_bounded_summary_restricts_rows() {
    let pool = setup_test_db().await;
    let repo = ObservationRepository::new(pool.clone());

    insert_measurement(&pool, "USC00511111", "2016-01-01", None, 70.0).await;
    insert_measurement(&pool, "USC00511111", "2016-06-01", None, 80.0).await;
    insert_measurement(&pool, "USC00511111", "2016-12-01", None, 90.0).await;

    let open = repo.summarize_temperatures_since("2016-01-01").await.unwrap();
    let bounded = repo
        .summarize_temperatures_between("2016-01-01", "2016-06-01")
        .await
        .unwrap();

    assert_eq!(open.max, Some(90.0));
    assert_eq!(bounded.max, Some(80.0));
    assert_eq!(bounded.min, open.min);
    assert_eq!(bounded.avg, Some(75.0));
}

#[tokio::test]
async fn test_summary_of_empty_set_is_all_null() {
    let pool = setup_test_db().await;
    let repo = ObservationRepository::new(pool.clone());

    let summary = repo.summarize_temperatures_since("2016-01-01").await.unwrap();
    assert_eq!(summary.min, None);
    assert_eq!(summary.avg, None);
    assert_eq!(summary.max, None);

    let summary = repo
        .summarize_temperatures_between("2016-01-01", "2016-06-01")
        .await
        .unwrap();
    assert_eq!(summary.min, None);
    assert_eq!(summary.avg, None);
    assert_eq!(summary.max, None);
}

#[tokio::test]
async fn test_station_counts_sum_to_total_rows() {
    let pool = setup_test_db().await;
    let repo = ObservationRepository::new(pool.clone());

    for date in ["2017-01-01", "2017-01-02", "2017-01-03"] {
        insert_measurement(&pool, "USC00511111", date, Some(0.0), 70.0).await;
    }
    for date in ["2017-01-01", "2017-01-02"] {
        insert_measurement(&pool, "USC00522222", date, Some(0.0), 71.0).await;
    }

    let counts = repo.count_measurements_per_station().await.unwrap();
    let total = repo.count_measurements().await.unwrap();

    let sum: i64 = counts.iter().map(|c| c.measurement_count).sum();
    assert_eq!(sum, total);
    assert_eq!(total, 5);

    // Ordered most active first
    assert_eq!(counts[0].station, "USC00511111");
    assert_eq!(counts[0].measurement_count, 3);
    assert_eq!(counts[1].measurement_count, 2);
}

#[tokio::test]
async fn test_precipitation_groups_distinct_values_per_date() {
    let pool = setup_test_db().await;
    let repo = ObservationRepository::new(pool.clone());

    insert_measurement(&pool, "USC00511111", "2017-06-01", Some(0.1), 70.0).await;
    insert_measurement(&pool, "USC00522222", "2017-06-01", Some(0.2), 71.0).await;
    // Duplicate value collapses under DISTINCT
    insert_measurement(&pool, "USC00533333", "2017-06-01", Some(0.1), 72.0).await;
    insert_measurement(&pool, "USC00511111", "2017-06-02", None, 69.0).await;

    let rows = repo
        .find_daily_precipitation_since("2017-01-01")
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2017-06-01");

    let joined = rows[0].precipitation.as_deref().unwrap();
    let parts: std::collections::BTreeSet<&str> = joined.split(',').collect();
    assert_eq!(parts.len(), 2);
    assert!(parts.contains("0.1"));
    assert!(parts.contains("0.2"));

    // A date whose only reading is null joins to nothing
    assert_eq!(rows[1].date, "2017-06-02");
    assert_eq!(rows[1].precipitation, None);
}

#[tokio::test]
async fn test_temperatures_for_station_ascending() {
    let pool = setup_test_db().await;
    let repo = ObservationRepository::new(pool.clone());

    insert_measurement(&pool, "USC00511111", "2017-03-01", None, 72.0).await;
    insert_measurement(&pool, "USC00511111", "2017-01-01", None, 65.0).await;
    insert_measurement(&pool, "USC00511111", "2016-01-01", None, 60.0).await;
    insert_measurement(&pool, "USC00522222", "2017-02-01", None, 99.0).await;

    let rows = repo
        .find_temperatures_for_station_since("USC00511111", "2016-08-18")
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2017-01-01");
    assert_eq!(rows[0].tobs, 65.0);
    assert_eq!(rows[1].date, "2017-03-01");
    assert_eq!(rows[1].tobs, 72.0);
}
