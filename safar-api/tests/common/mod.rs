#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;
use uuid::Uuid;

use safar_api::state::{AppState, AuthConfig};
use safar_core::account::{GuideAccount, TouristAccount};
use safar_core::booking::{Booking, BookingStatus};
use safar_core::guide::{GuideProfile, ProfileUpdate, SearchFilter};
use safar_core::repository::{
    BookingRepository, GuideAccountRepository, GuideRepository, RepoError,
    TouristAccountRepository,
};

// ============================================================================
// In-memory repository doubles
// ============================================================================

#[derive(Default)]
struct MemGuideAccounts {
    items: RwLock<HashMap<Uuid, GuideAccount>>,
}

#[async_trait]
impl GuideAccountRepository for MemGuideAccounts {
    async fn create(&self, account: &GuideAccount) -> Result<(), RepoError> {
        self.items.write().await.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GuideAccount>, RepoError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<GuideAccount>, RepoError> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn set_has_profile(&self, id: Uuid, has_profile: bool) -> Result<(), RepoError> {
        if let Some(account) = self.items.write().await.get_mut(&id) {
            account.has_profile = has_profile;
            account.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Default)]
struct MemTouristAccounts {
    items: RwLock<HashMap<Uuid, TouristAccount>>,
}

#[async_trait]
impl TouristAccountRepository for MemTouristAccounts {
    async fn create(&self, account: &TouristAccount) -> Result<(), RepoError> {
        self.items.write().await.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TouristAccount>, RepoError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<TouristAccount>, RepoError> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }
}

#[derive(Default)]
struct MemGuides {
    items: RwLock<HashMap<Uuid, GuideProfile>>,
}

#[async_trait]
impl GuideRepository for MemGuides {
    async fn create(&self, guide: &GuideProfile) -> Result<(), RepoError> {
        self.items.write().await.insert(guide.id, guide.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GuideProfile>, RepoError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<GuideProfile>, RepoError> {
        let mut items = self.items.write().await;
        let Some(guide) = items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &update.full_name {
            guide.full_name = v.clone();
        }
        if let Some(v) = &update.email {
            guide.email = v.clone();
        }
        if let Some(v) = &update.phone {
            guide.phone = Some(v.clone());
        }
        if let Some(v) = &update.city {
            guide.city = v.clone();
        }
        if let Some(v) = &update.languages {
            guide.languages = v.clone();
        }
        if let Some(v) = &update.experience {
            guide.experience = v.clone();
        }
        if let Some(v) = update.hourly_rate {
            guide.hourly_rate = v;
        }
        if let Some(v) = &update.bio {
            guide.bio = Some(v.clone());
        }
        if let Some(v) = &update.profile_image {
            guide.profile_image = v.clone();
        }
        guide.updated_at = Utc::now();
        Ok(Some(guide.clone()))
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<GuideProfile>, RepoError> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|g| filter.matches(g))
            .cloned()
            .collect())
    }

    async fn record_rating(
        &self,
        id: Uuid,
        rating: f64,
    ) -> Result<Option<GuideProfile>, RepoError> {
        let mut items = self.items.write().await;
        let Some(guide) = items.get_mut(&id) else {
            return Ok(None);
        };
        guide.apply_rating(rating);
        Ok(Some(guide.clone()))
    }

    async fn increment_request_count(&self, id: Uuid) -> Result<(), RepoError> {
        if let Some(guide) = self.items.write().await.get_mut(&id) {
            guide.request_count += 1;
            guide.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Default)]
struct MemBookings {
    items: RwLock<HashMap<Uuid, Booking>>,
}

impl MemBookings {
    async fn list_where(
        &self,
        predicate: impl Fn(&Booking) -> bool,
        status: Option<BookingStatus>,
    ) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .items
            .read()
            .await
            .values()
            .filter(|b| predicate(b))
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }
}

#[async_trait]
impl BookingRepository for MemBookings {
    async fn create(&self, booking: &Booking) -> Result<(), RepoError> {
        self.items.write().await.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list_by_guide(
        &self,
        guide_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, RepoError> {
        Ok(self.list_where(|b| b.guide_id == guide_id, status).await)
    }

    async fn list_by_tourist(
        &self,
        tourist_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, RepoError> {
        Ok(self.list_where(|b| b.tourist_id == tourist_id, status).await)
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        let mut items = self.items.write().await;
        match items.get_mut(&id) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }
}

// ============================================================================
// Test app + request helpers
// ============================================================================

pub fn test_app() -> Router {
    let state = AppState {
        guide_accounts: Arc::new(MemGuideAccounts::default()),
        tourist_accounts: Arc::new(MemTouristAccounts::default()),
        guides: Arc::new(MemGuides::default()),
        bookings: Arc::new(MemBookings::default()),
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        },
    };
    safar_api::app(state)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn register_guide(app: &Router, email: &str, full_name: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/guide-auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "hunter2!",
            "full_name": full_name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "guide register failed: {body}");
    body
}

pub async fn register_tourist(app: &Router, email: &str, full_name: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/tourist-auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "hunter2!",
            "full_name": full_name,
            "nationality": "Indian",
        })),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "tourist register failed: {body}"
    );
    body
}

pub async fn create_profile(app: &Router, token: &str, city: &str, hourly_rate: i64) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/guides",
        Some(token),
        Some(json!({
            "full_name": "Asha Verma",
            "email": "asha@example.com",
            "city": city,
            "languages": ["Hindi", "English"],
            "experience": "6 years",
            "hourly_rate": hourly_rate,
            "profile_image": "https://img.example.com/asha.jpg",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "profile create failed: {body}");
    body
}

pub async fn create_booking(
    app: &Router,
    tourist_token: &str,
    guide_id: &str,
    start: &str,
    end: &str,
    party_size: i64,
) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/bookings",
        Some(tourist_token),
        Some(json!({
            "guide_id": guide_id,
            "start_date": start,
            "end_date": end,
            "party_size": party_size,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "booking create failed: {body}");
    body
}

pub fn token(body: &Value) -> String {
    body["token"].as_str().expect("token missing").to_string()
}

pub fn id(body: &Value) -> String {
    body["id"].as_str().expect("id missing").to_string()
}
