// src/handlers/payments.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::payment::{
        CreatePaymentPayload, LedgerParams, Payment, PaymentWithDeal, UpdatePaymentPayload,
    },
};

// GET /api/payments: todos os pagamentos visíveis para o usuário,
// cada um com o nome do negócio
pub async fn list_all_payments(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<PaymentWithDeal>>, AppError> {
    let payments = app_state.payment_service.list_all(&user).await?;
    Ok(Json(payments))
}

// GET /api/payments/ledger: o razão com filtros e ordenação
#[utoipa::path(
    get,
    path = "/api/payments/ledger",
    tag = "Payments",
    params(LedgerParams),
    responses(
        (status = 200, description = "Pagamentos filtrados e ordenados", body = Vec<Payment>),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn payments_ledger(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<LedgerParams>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.payment_service.ledger(&user, &params).await?;
    Ok((StatusCode::OK, Json(payments)))
}

// GET /api/payments/{deal_id}
pub async fn list_payments(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = app_state.payment_service.list_for_deal(deal_id).await?;
    Ok(Json(payments))
}

// POST /api/payments/{deal_id}
pub async fn create_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(deal_id): Path<i64>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = app_state
        .payment_service
        .create(&user, deal_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

// GET /api/payments/{deal_id}/{payment_id}
pub async fn get_payment(
    State(app_state): State<AppState>,
    Path((deal_id, payment_id)): Path<(i64, i64)>,
) -> Result<Json<Payment>, AppError> {
    let payment = app_state.payment_service.get(deal_id, payment_id).await?;
    Ok(Json(payment))
}

// PUT /api/payments/{deal_id}/{payment_id}
pub async fn update_payment(
    State(app_state): State<AppState>,
    Path((deal_id, payment_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdatePaymentPayload>,
) -> Result<Json<Payment>, AppError> {
    let payment = app_state
        .payment_service
        .update(deal_id, payment_id, &payload)
        .await?;
    Ok(Json(payment))
}

// DELETE /api/payments/{deal_id}/{payment_id}
pub async fn delete_payment(
    State(app_state): State<AppState>,
    Path((deal_id, payment_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    app_state
        .payment_service
        .delete(deal_id, payment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
