pub mod app_config;
pub mod database;
pub mod booking_repo;
pub mod amadeus;

pub use amadeus::AmadeusClient;
pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
