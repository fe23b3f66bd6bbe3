use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guide's public directory profile. The id always equals the owning
/// guide account's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: String,
    pub languages: Vec<String>,
    pub experience: String,
    pub hourly_rate: i64,
    pub bio: Option<String>,
    pub profile_image: String,
    pub rating: f64,
    pub total_tours: i32,
    pub request_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuideProfile {
    /// Folds a submitted rating into the running average:
    /// `(rating * total_tours + submitted) / (total_tours + 1)`.
    pub fn apply_rating(&mut self, submitted: f64) {
        let tours = f64::from(self.total_tours);
        self.rating = (self.rating * tours + submitted) / (tours + 1.0);
        self.total_tours += 1;
        self.updated_at = Utc::now();
    }
}

/// Partial profile update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub languages: Option<Vec<String>>,
    pub experience: Option<String>,
    pub hourly_rate: Option<i64>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

/// Directory search filters, combined with logical AND. Absent filters are
/// no-ops.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Exact city match.
    pub city: Option<String>,
    /// Matches guides speaking any of the listed languages.
    pub languages: Option<Vec<String>>,
    /// Inclusive lower bound.
    pub min_rating: Option<f64>,
    /// Inclusive upper bound on the hourly rate.
    pub max_price: Option<i64>,
}

impl SearchFilter {
    pub fn matches(&self, guide: &GuideProfile) -> bool {
        if let Some(city) = &self.city {
            if &guide.city != city {
                return false;
            }
        }
        if let Some(languages) = &self.languages {
            if !languages.iter().any(|l| guide.languages.contains(l)) {
                return false;
            }
        }
        if let Some(min_rating) = self.min_rating {
            if guide.rating < min_rating {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if guide.hourly_rate > max_price {
                return false;
            }
        }
        true
    }
}
