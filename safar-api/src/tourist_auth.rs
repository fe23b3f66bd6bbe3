use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use safar_core::account::TouristAccount;

use crate::error::ApiError;
use crate::middleware::auth::{issue_token, tourist_auth_middleware, Claims, ROLE_TOURIST};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/tourist-auth/profile", get(profile))
        .route_layer(middleware::from_fn_with_state(
            state,
            tourist_auth_middleware,
        ));

    Router::new()
        .route("/tourist-auth/register", post(register))
        .route("/tourist-auth/login", post(login))
        .merge(protected)
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    full_name: String,
    nationality: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    #[serde(flatten)]
    account: TouristAccount,
    token: String,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty()
        || req.password.is_empty()
        || req.full_name.trim().is_empty()
        || req.nationality.trim().is_empty()
    {
        return Err(ApiError::ValidationError(
            "Email, password, full name and nationality are required".to_string(),
        ));
    }

    if state
        .tourist_accounts
        .find_by_email(&email)
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateError(
            "Email already registered".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
    let account = TouristAccount::new(email, password_hash, req.full_name, req.nationality);
    state.tourist_accounts.create(&account).await?;

    let token = issue_token(&state.auth, account.id, &account.email, ROLE_TOURIST)?;
    info!("Tourist registered: {}", account.id);

    Ok((StatusCode::CREATED, Json(AuthResponse { account, token })))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // Lookups use the normalized form the account was stored under.
    let email = req.email.trim().to_lowercase();
    let account = state
        .tourist_accounts
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::AuthenticationError("Invalid credentials".to_string()))?;

    let password = req.password;
    let password_hash = account.password_hash.clone();
    let is_match =
        tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash)).await??;
    if !is_match {
        return Err(ApiError::AuthenticationError(
            "Invalid credentials".to_string(),
        ));
    }

    let token = issue_token(&state.auth, account.id, &account.email, ROLE_TOURIST)?;
    info!("Tourist logged in: {}", account.id);

    Ok(Json(AuthResponse { account, token }))
}

async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<TouristAccount>, ApiError> {
    let account = state
        .tourist_accounts
        .find_by_id(claims.subject_id()?)
        .await?
        .ok_or_else(|| ApiError::NotFoundError("Tourist not found".to_string()))?;

    Ok(Json(account))
}
