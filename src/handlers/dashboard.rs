// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{DealListQuery, DealStats, PaginatedDeals},
};

// A composição do dashboard: listagem paginada + estatísticas, ambas já
// recortadas pelo papel do usuário.

// GET /api/deals/paginated
#[utoipa::path(
    get,
    path = "/api/deals/paginated",
    tag = "Dashboard",
    params(DealListQuery),
    responses(
        (status = 200, description = "Página de negócios com metadados de paginação", body = PaginatedDeals),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_deals_paginated(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DealListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.deal_service.list_paginated(&user, &query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// GET /api/deals/stats
#[utoipa::path(
    get,
    path = "/api/deals/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contagens por status e anos disponíveis", body = DealStats),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_deals_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.deal_service.stats(&user).await?;
    Ok((StatusCode::OK, Json(stats)))
}
