use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AppState, AuthConfig};

pub const ROLE_GUIDE: &str = "GUIDE";
pub const ROLE_TOURIST: &str = "TOURIST";

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    /// The authenticated account id. The sub is always a uuid we issued, so
    /// a parse failure means a token we did not mint.
    pub fn subject_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| ApiError::AuthenticationError("Invalid token".to_string()))
    }
}

pub fn issue_token(
    auth: &AuthConfig,
    id: Uuid,
    email: &str,
    role: &str,
) -> Result<String, ApiError> {
    let claims = Claims {
        sub: id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalServerError(format!("Token encoding failed: {}", e)))
}

fn decode_bearer(
    state: &AppState,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Claims, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer
        .ok_or_else(|| ApiError::AuthenticationError("Authentication required".to_string()))?;

    let token_data = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::AuthenticationError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

// ============================================================================
// Authentication middlewares
// ============================================================================

pub async fn guide_auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = decode_bearer(&state, bearer)?;

    if claims.role != ROLE_GUIDE {
        return Err(ApiError::AuthorizationError(
            "Guide access required".to_string(),
        ));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub async fn tourist_auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = decode_bearer(&state, bearer)?;

    if claims.role != ROLE_TOURIST {
        return Err(ApiError::AuthorizationError(
            "Tourist access required".to_string(),
        ));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// For routes both sides of the marketplace may call; per-resource checks
/// happen in the handlers.
pub async fn any_auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = decode_bearer(&state, bearer)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
