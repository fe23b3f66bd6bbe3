pub mod account_repo;
pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod guide_repo;

pub use account_repo::{PgGuideAccountRepository, PgTouristAccountRepository};
pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use guide_repo::PgGuideRepository;
