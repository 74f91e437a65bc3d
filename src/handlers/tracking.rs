// src/handlers/tracking.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::tracking::{DealFinancials, PaymentTrackingResponse},
};

// As visões derivadas da conciliação. Sempre recalculadas do snapshot
// corrente; o cliente pode chamar quantas vezes quiser.

// GET /api/deals/{id}/payment-tracking
#[utoipa::path(
    get,
    path = "/api/deals/{deal_id}/payment-tracking",
    tag = "Tracking",
    params(
        ("deal_id" = i64, Path, description = "ID do negócio")
    ),
    responses(
        (status = 200, description = "Acompanhamento por proprietário e investidor", body = PaymentTrackingResponse),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Negócio não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn payment_tracking(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let tracking = app_state.tracking_service.payment_tracking(deal_id).await?;
    Ok((StatusCode::OK, Json(tracking)))
}

// GET /api/deals/{id}/financials
#[utoipa::path(
    get,
    path = "/api/deals/{deal_id}/financials",
    tag = "Tracking",
    params(
        ("deal_id" = i64, Path, description = "ID do negócio")
    ),
    responses(
        (status = 200, description = "Resumo financeiro do negócio", body = DealFinancials),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Negócio não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn deal_financials(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let financials = app_state.tracking_service.financials(deal_id).await?;
    Ok((StatusCode::OK, Json(financials)))
}
