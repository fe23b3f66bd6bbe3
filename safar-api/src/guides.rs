use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use safar_core::guide::{GuideProfile, ProfileUpdate, SearchFilter};

use crate::error::ApiError;
use crate::middleware::auth::{guide_auth_middleware, Claims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/guides", post(create_profile))
        .route("/guides/{id}", put(update_profile))
        .route_layer(middleware::from_fn_with_state(state, guide_auth_middleware));

    Router::new()
        .route("/guides", get(list_guides))
        .route("/guides/search", get(search_guides))
        .route("/guides/{id}", get(get_guide))
        .route("/guides/{id}/rating", put(record_rating))
        .merge(protected)
}

#[derive(Debug, Deserialize)]
struct CreateProfileRequest {
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    languages: Option<Vec<String>>,
    experience: Option<String>,
    hourly_rate: Option<i64>,
    bio: Option<String>,
    profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    city: Option<String>,
    /// Comma-separated, e.g. `languages=Hindi,English`.
    languages: Option<String>,
    min_rating: Option<f64>,
    max_price: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RatingRequest {
    rating: f64,
}

fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ApiError::ValidationError(format!("{} is required", name))),
    }
}

async fn create_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<GuideProfile>), ApiError> {
    let id = claims.subject_id()?;

    let full_name = required(req.full_name, "Full name")?;
    let email = required(req.email, "Email")?;
    let city = required(req.city, "City")?;
    let profile_image = required(req.profile_image, "Profile image")?;
    let experience = required(req.experience, "Experience")?;

    let hourly_rate = req
        .hourly_rate
        .ok_or_else(|| ApiError::ValidationError("Hourly rate is required".to_string()))?;
    if hourly_rate < 0 {
        return Err(ApiError::ValidationError(
            "Hourly rate must not be negative".to_string(),
        ));
    }

    if state.guides.find_by_id(id).await?.is_some() {
        return Err(ApiError::DuplicateError(
            "Guide profile already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let guide = GuideProfile {
        id,
        full_name,
        email,
        phone: req.phone,
        city,
        languages: req.languages.unwrap_or_default(),
        experience,
        hourly_rate,
        bio: req.bio,
        profile_image,
        rating: 0.0,
        total_tours: 0,
        request_count: 0,
        created_at: now,
        updated_at: now,
    };

    state.guides.create(&guide).await?;
    state.guide_accounts.set_has_profile(id, true).await?;

    info!("Guide profile created: {}", guide.id);
    Ok((StatusCode::CREATED, Json(guide)))
}

async fn get_guide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GuideProfile>, ApiError> {
    let guide = state
        .guides
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Guide not found".to_string()))?;

    Ok(Json(guide))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<GuideProfile>, ApiError> {
    if claims.subject_id()? != id {
        return Err(ApiError::AuthorizationError(
            "Not authorized to update this profile".to_string(),
        ));
    }

    if let Some(rate) = update.hourly_rate {
        if rate < 0 {
            return Err(ApiError::ValidationError(
                "Hourly rate must not be negative".to_string(),
            ));
        }
    }

    let guide = state
        .guides
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Guide not found".to_string()))?;

    Ok(Json(guide))
}

async fn list_guides(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GuideProfile>>, ApiError> {
    let filter = SearchFilter {
        city: query.city,
        ..Default::default()
    };

    let guides = state.guides.search(&filter).await?;
    Ok(Json(guides))
}

async fn search_guides(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<GuideProfile>>, ApiError> {
    let languages = query.languages.map(|raw| {
        raw.split(',')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
    });

    let filter = SearchFilter {
        city: query.city,
        languages,
        min_rating: query.min_rating,
        max_price: query.max_price,
    };

    let guides = state.guides.search(&filter).await?;
    Ok(Json(guides))
}

async fn record_rating(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RatingRequest>,
) -> Result<Json<GuideProfile>, ApiError> {
    if !(0.0..=5.0).contains(&req.rating) {
        return Err(ApiError::ValidationError(
            "Rating must be between 0 and 5".to_string(),
        ));
    }

    let guide = state
        .guides
        .record_rating(id, req.rating)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Guide not found".to_string()))?;

    info!(
        "Rating recorded for guide {} (now {:.2} over {} tours)",
        guide.id, guide.rating, guide.total_tours
    );
    Ok(Json(guide))
}
