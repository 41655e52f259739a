pub mod error;
pub mod models;
pub mod observation_repository;
pub mod station_repository;

pub use error::DbError;
pub use models::*;
pub use observation_repository::ObservationRepository;
pub use station_repository::StationRepository;
