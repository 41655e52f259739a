use sqlx::sqlite::SqlitePoolOptions;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use climate_observation_service::api::{create_router, AppState};
use climate_observation_service::config::Config;
use climate_observation_service::db::ObservationRepository;
use climate_observation_service::services::ObservationService;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,climate_observation_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;
    info!("Starting observation query service with config: {:?}", config);

    // Create database connection pool; an unreachable store aborts startup
    info!("Connecting to database...");
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    info!("Database connection established");

    // Declare the schema; the store ships pre-populated, so this is a no-op
    // pass on an existing database
    info!("Checking database schema...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database schema ready");

    // Create repository and service
    let observation_repo = ObservationRepository::new(pool.clone());
    let observation_service = ObservationService::new(observation_repo);

    // Create API router
    let app_state = AppState {
        observation_service,
    };
    let app = create_router(app_state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
