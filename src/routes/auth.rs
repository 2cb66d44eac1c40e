use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::{
    middleware::rate_limit::check_rate_limit,
    models::{
        account::{AccountProfile, LoginRequest, RefreshRequest},
        auth::{AuthError, CurrentAccount},
    },
    services::auth::AuthService,
    AppState,
};

/// POST /auth/login — verifies the credentials and returns the token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let (email, password) = match (body.email, body.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(AuthError::MissingCredentials.into()),
    };

    // 5 attempts per 15 min per email
    let rate_key = format!("rate:login:{}", email.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 5, 900).await?;

    AuthService::login(&state.db, &email, &password, &state.config.jwt_secret)
        .await
        .map(|res| Json(serde_json::to_value(res).unwrap()))
        .map_err(Into::into)
}

/// POST /auth/refresh — exchanges a refresh token for a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let token = body.refresh.filter(|t| !t.is_empty()).ok_or(AuthError::TokenInvalid)?;

    AuthService::refresh(&state.db, &token, &state.config.jwt_secret)
        .await
        .map(|res| Json(serde_json::to_value(res).unwrap()))
        .map_err(Into::into)
}

/// GET /auth/me — profile of the authenticated account.
pub async fn me(current: CurrentAccount) -> Json<Value> {
    let profile = AccountProfile::from(current.account);
    Json(serde_json::to_value(profile).unwrap())
}
