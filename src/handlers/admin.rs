// src/handlers/admin.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::auth::{CreateUserPayload, UpdateUserPayload, User},
};

// Administração de usuários: tudo aqui exige o papel admin.

pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.user_service.list_users().await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let user = app_state.user_service.create_user(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let user = app_state.user_service.update_user(user_id, &payload).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.user_service.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
