use std::sync::Arc;

use safar_core::repository::{
    BookingRepository, GuideAccountRepository, GuideRepository, TouristAccountRepository,
};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub guide_accounts: Arc<dyn GuideAccountRepository>,
    pub tourist_accounts: Arc<dyn TouristAccountRepository>,
    pub guides: Arc<dyn GuideRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub auth: AuthConfig,
}
