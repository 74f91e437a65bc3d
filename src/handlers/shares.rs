// src/handlers/shares.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::party::{InvestorSharesPayload, OwnerSharesPayload, SharesUpdatedResponse},
};

// Gravação das participações calculadas na tela de detalhe. O corpo
// traz {id, percentage_share, investment_amount} por parte, já em
// inteiros; o serviço revalida a faixa antes de gravar.

// PUT /api/deals/{id}/owner-shares
#[utoipa::path(
    put,
    path = "/api/deals/{deal_id}/owner-shares",
    tag = "Shares",
    request_body = OwnerSharesPayload,
    params(
        ("deal_id" = i64, Path, description = "ID do negócio")
    ),
    responses(
        (status = 200, description = "Participações dos proprietários gravadas", body = SharesUpdatedResponse),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Negócio não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_owner_shares(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(payload): Json<OwnerSharesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .share_service
        .update_owner_shares(deal_id, &payload.owners)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

// PUT /api/deals/{id}/investor-shares
#[utoipa::path(
    put,
    path = "/api/deals/{deal_id}/investor-shares",
    tag = "Shares",
    request_body = InvestorSharesPayload,
    params(
        ("deal_id" = i64, Path, description = "ID do negócio")
    ),
    responses(
        (status = 200, description = "Participações dos investidores gravadas", body = SharesUpdatedResponse),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Negócio não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_investor_shares(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(payload): Json<InvestorSharesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .share_service
        .update_investor_shares(deal_id, &payload.investors)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}
