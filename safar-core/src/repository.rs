use async_trait::async_trait;
use uuid::Uuid;

use crate::account::{GuideAccount, TouristAccount};
use crate::booking::{Booking, BookingStatus};
use crate::guide::{GuideProfile, ProfileUpdate, SearchFilter};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for guide authentication accounts
#[async_trait]
pub trait GuideAccountRepository: Send + Sync {
    async fn create(&self, account: &GuideAccount) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GuideAccount>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<GuideAccount>, RepoError>;

    async fn set_has_profile(&self, id: Uuid, has_profile: bool) -> Result<(), RepoError>;
}

/// Repository trait for tourist authentication accounts
#[async_trait]
pub trait TouristAccountRepository: Send + Sync {
    async fn create(&self, account: &TouristAccount) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TouristAccount>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<TouristAccount>, RepoError>;
}

/// Repository trait for the guide directory
#[async_trait]
pub trait GuideRepository: Send + Sync {
    async fn create(&self, guide: &GuideProfile) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GuideProfile>, RepoError>;

    /// Merges the partial update into the stored profile; `None` when the
    /// profile does not exist.
    async fn update(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<GuideProfile>, RepoError>;

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<GuideProfile>, RepoError>;

    /// Applies the weighted-average rating formula and bumps total_tours as
    /// one atomic write.
    async fn record_rating(
        &self,
        id: Uuid,
        rating: f64,
    ) -> Result<Option<GuideProfile>, RepoError>;

    async fn increment_request_count(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Repository trait for bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    /// Newest first, optionally restricted to one status.
    async fn list_by_guide(
        &self,
        guide_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, RepoError>;

    async fn list_by_tourist(
        &self,
        tourist_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, RepoError>;

    /// Compare-and-swap on the expected current status. `None` when the id
    /// is unknown or another writer changed the status first.
    async fn set_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, RepoError>;
}
