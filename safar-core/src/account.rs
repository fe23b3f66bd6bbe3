use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Authentication identity for a guide. The password hash never leaves the
/// backend.
#[derive(Debug, Clone, Serialize)]
pub struct GuideAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub has_profile: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuideAccount {
    pub fn new(email: String, password_hash: String, full_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            has_profile: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Authentication identity for a tourist. Emails are normalized to
/// lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, Serialize)]
pub struct TouristAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub nationality: String,
    pub has_profile: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TouristAccount {
    pub fn new(
        email: String,
        password_hash: String,
        full_name: String,
        nationality: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password_hash,
            full_name: full_name.trim().to_string(),
            nationality: nationality.trim().to_string(),
            has_profile: false,
            created_at: now,
            updated_at: now,
        }
    }
}
