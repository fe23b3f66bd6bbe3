use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use safar_core::account::GuideAccount;
use safar_core::booking::{Booking, BookingStatus};

use crate::bookings::{apply_transition, parse_status, parse_status_filter};
use crate::error::ApiError;
use crate::middleware::auth::{guide_auth_middleware, issue_token, Claims, ROLE_GUIDE};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/guide-auth/{guide_id}/requests", get(list_requests))
        .route(
            "/guide-auth/{guide_id}/requests/{request_id}",
            patch(update_request_status),
        )
        .route_layer(middleware::from_fn_with_state(state, guide_auth_middleware));

    Router::new()
        .route("/guide-auth/register", post(register))
        .route("/guide-auth/login", post(login))
        .merge(protected)
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    #[serde(flatten)]
    account: GuideAccount,
    token: String,
}

/// A guide-facing request view: the booking plus the requesting tourist's
/// display name, looked up rather than stored.
#[derive(Debug, Serialize)]
struct RequestView {
    #[serde(flatten)]
    booking: Booking,
    tourist_name: String,
}

#[derive(Debug, Deserialize)]
struct RequestListQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateRequestStatus {
    status: String,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = req.email.trim().to_string();
    if email.is_empty() || req.password.is_empty() || req.full_name.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "Email, password and full name are required".to_string(),
        ));
    }

    if state.guide_accounts.find_by_email(&email).await?.is_some() {
        return Err(ApiError::DuplicateError(
            "Email already registered".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
    let account = GuideAccount::new(email, password_hash, req.full_name.trim().to_string());
    state.guide_accounts.create(&account).await?;

    let token = issue_token(&state.auth, account.id, &account.email, ROLE_GUIDE)?;
    info!("Guide registered: {}", account.id);

    Ok((StatusCode::CREATED, Json(AuthResponse { account, token })))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // One error for unknown email and wrong password alike.
    let mut account = state
        .guide_accounts
        .find_by_email(req.email.trim())
        .await?
        .ok_or_else(|| {
            ApiError::AuthenticationError("Invalid email or password".to_string())
        })?;

    let password = req.password;
    let password_hash = account.password_hash.clone();
    let is_match =
        tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash)).await??;
    if !is_match {
        return Err(ApiError::AuthenticationError(
            "Invalid email or password".to_string(),
        ));
    }

    // Recompute has_profile from the directory, persisting a change.
    let has_profile = state.guides.find_by_id(account.id).await?.is_some();
    if has_profile != account.has_profile {
        state
            .guide_accounts
            .set_has_profile(account.id, has_profile)
            .await?;
        account.has_profile = has_profile;
    }

    let token = issue_token(&state.auth, account.id, &account.email, ROLE_GUIDE)?;
    info!("Guide logged in: {}", account.id);

    Ok(Json(AuthResponse { account, token }))
}

async fn list_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(guide_id): Path<Uuid>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<RequestView>>, ApiError> {
    if claims.subject_id()? != guide_id {
        return Err(ApiError::AuthorizationError(
            "Not authorized to access these requests".to_string(),
        ));
    }

    if state.guides.find_by_id(guide_id).await?.is_none() {
        return Err(ApiError::NotFoundError("Guide not found".to_string()));
    }

    let status = parse_status_filter(query.status.as_deref())?;
    let bookings = state.bookings.list_by_guide(guide_id, status).await?;

    let mut views = Vec::with_capacity(bookings.len());
    for booking in bookings {
        views.push(to_request_view(&state, booking).await?);
    }

    Ok(Json(views))
}

async fn update_request_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((guide_id, request_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateRequestStatus>,
) -> Result<Json<RequestView>, ApiError> {
    if claims.subject_id()? != guide_id {
        return Err(ApiError::AuthorizationError(
            "Not authorized to update this request".to_string(),
        ));
    }

    // The guide-facing surface only exposes the accept/reject decisions.
    let target = parse_status(&req.status)?;
    if !matches!(target, BookingStatus::Accepted | BookingStatus::Rejected) {
        return Err(ApiError::ValidationError("Invalid status".to_string()));
    }

    let booking = state
        .bookings
        .find_by_id(request_id)
        .await?
        .filter(|b| b.guide_id == guide_id)
        .ok_or_else(|| ApiError::NotFoundError("Request not found".to_string()))?;

    let updated = apply_transition(&state, booking, target, &claims).await?;
    let view = to_request_view(&state, updated).await?;

    Ok(Json(view))
}

async fn to_request_view(state: &AppState, booking: Booking) -> Result<RequestView, ApiError> {
    let tourist_name = state
        .tourist_accounts
        .find_by_id(booking.tourist_id)
        .await?
        .map(|t| t.full_name)
        .unwrap_or_default();

    Ok(RequestView {
        booking,
        tourist_name,
    })
}
