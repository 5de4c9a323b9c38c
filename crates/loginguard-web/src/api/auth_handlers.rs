use std::time::Instant;

use axum::extract::State;
use axum::Json;

use crate::auth::{jwt, password};
use crate::auth::middleware::AuthUser;
use crate::dto::*;
use crate::error::{AppError, INVALID_CREDENTIALS};
use crate::state::AppState;

fn invalid_credentials() -> AppError {
    AppError::Auth(INVALID_CREDENTIALS.to_string())
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = body.username;

    if username.is_empty() || body.password.is_empty() {
        if !username.is_empty() {
            state.limiter.on_failed_login_attempt(&username);
        }
        return Err(invalid_credentials());
    }

    let config = state.config.clone();
    let dummy_hash = state.dummy_hash.clone();
    let candidate = username.clone();
    let secret = body.password;
    let valid = tokio::task::spawn_blocking(move || {
        password::verify_login(&config, &dummy_hash, &candidate, &secret)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if !valid {
        tracing::warn!("Failed login attempt for user: {username}");
        state.limiter.on_authentication_failure(&username);
        return Err(invalid_credentials());
    }

    // Credentials are good; the limiter still gets the final word.
    state.limiter.check(&username)?;
    state.limiter.on_authentication_success(&username);

    tracing::info!("Login succeeded for user: {username}");

    let issued = jwt::issue(&state.config.auth, &username)?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

pub async fn logout(
    user: AuthUser,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    state.revoked_tokens.insert(user.jti, Instant::now());
    state.limiter.on_logout(&user.sub);
    tracing::info!("User logged out: {}", user.sub);
    Json(serde_json::json!({ "success": true }))
}

pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse { username: user.sub })
}
