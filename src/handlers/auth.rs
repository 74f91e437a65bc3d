// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, PublicUser, RegisterUserPayload, User},
};

// Handler de registro
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state
        .auth_service
        .register_user(&payload.username, &payload.password, payload.full_name)
        .await?;

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

// Handler da rota protegida /me
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
