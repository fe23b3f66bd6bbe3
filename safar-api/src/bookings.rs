use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use safar_core::booking::{Booking, BookingStatus, Party};

use crate::error::ApiError;
use crate::middleware::auth::{
    any_auth_middleware, tourist_auth_middleware, Claims, ROLE_GUIDE, ROLE_TOURIST,
};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let tourist_only = Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tourist_auth_middleware,
        ));

    Router::new()
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/status", patch(update_status))
        .route("/bookings/tourist/{tourist_id}", get(list_by_tourist))
        .route("/bookings/guide/{guide_id}", get(list_by_guide))
        .route_layer(middleware::from_fn_with_state(state, any_auth_middleware))
        .merge(tourist_only)
}

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    guide_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    party_size: i32,
    notes: Option<String>,
    itinerary_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

pub(crate) fn parse_status(value: &str) -> Result<BookingStatus, ApiError> {
    BookingStatus::parse(value)
        .ok_or_else(|| ApiError::ValidationError(format!("Invalid status: {}", value)))
}

pub(crate) fn parse_status_filter(
    value: Option<&str>,
) -> Result<Option<BookingStatus>, ApiError> {
    value.map(parse_status).transpose()
}

/// Validates and applies one status transition. The caller must already be
/// authenticated; this enforces that they are a party to the booking, that
/// the transition is legal from the observed status, and that the right side
/// of the marketplace is driving it.
pub(crate) async fn apply_transition(
    state: &AppState,
    booking: Booking,
    target: BookingStatus,
    claims: &Claims,
) -> Result<Booking, ApiError> {
    let caller = claims.subject_id()?;

    if caller != booking.guide_id && caller != booking.tourist_id {
        return Err(ApiError::AuthorizationError(
            "Not authorized to access this booking".to_string(),
        ));
    }

    booking
        .status
        .ensure_transition(target)
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let authorized = match target.transition_actor() {
        Some(Party::Guide) => claims.role == ROLE_GUIDE && caller == booking.guide_id,
        Some(Party::Tourist) => claims.role == ROLE_TOURIST && caller == booking.tourist_id,
        None => false,
    };
    if !authorized {
        return Err(ApiError::AuthorizationError(format!(
            "Not authorized to mark this booking {}",
            target
        )));
    }

    let updated = state
        .bookings
        .set_status(booking.id, booking.status, target)
        .await?
        .ok_or_else(|| {
            ApiError::ValidationError("Booking status changed concurrently".to_string())
        })?;

    info!("Booking {} moved to {}", updated.id, updated.status);
    Ok(updated)
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let tourist_id = claims.subject_id()?;

    let guide = state
        .guides
        .find_by_id(req.guide_id)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Guide not found".to_string()))?;

    let booking = Booking::new(
        guide.id,
        tourist_id,
        req.start_date,
        req.end_date,
        req.party_size,
        req.notes,
        req.itinerary_id,
        guide.hourly_rate,
    )
    .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    state.bookings.create(&booking).await?;

    // The counter bump is a separate, non-transactional write.
    if let Err(e) = state.guides.increment_request_count(guide.id).await {
        warn!("Failed to increment request count for guide {}: {}", guide.id, e);
    }

    info!(
        "Booking {} created for guide {} ({} total)",
        booking.id, guide.id, booking.total_cost
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Booking not found".to_string()))?;

    let caller = claims.subject_id()?;
    if caller != booking.guide_id && caller != booking.tourist_id {
        return Err(ApiError::AuthorizationError(
            "Not authorized to access this booking".to_string(),
        ));
    }

    Ok(Json(booking))
}

async fn list_by_tourist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(tourist_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    if claims.subject_id()? != tourist_id {
        return Err(ApiError::AuthorizationError(
            "Not authorized to access these bookings".to_string(),
        ));
    }

    let status = parse_status_filter(query.status.as_deref())?;
    let bookings = state.bookings.list_by_tourist(tourist_id, status).await?;
    Ok(Json(bookings))
}

async fn list_by_guide(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(guide_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    if claims.subject_id()? != guide_id {
        return Err(ApiError::AuthorizationError(
            "Not authorized to access these bookings".to_string(),
        ));
    }

    let status = parse_status_filter(query.status.as_deref())?;
    let bookings = state.bookings.list_by_guide(guide_id, status).await?;
    Ok(Json(bookings))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Booking>, ApiError> {
    let target = parse_status(&req.status)?;

    let booking = state
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Booking not found".to_string()))?;

    let updated = apply_transition(&state, booking, target, &claims).await?;
    Ok(Json(updated))
}

/// Convenience alias for the tourist-side `pending -> cancelled` transition.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Booking not found".to_string()))?;

    let updated = apply_transition(&state, booking, BookingStatus::Cancelled, &claims).await?;
    Ok(Json(updated))
}
