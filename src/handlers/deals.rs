// src/handlers/deals.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminOnly, RequireRole},
    },
    models::{
        deal::{
            CreateDealPayload, Deal, DealAggregate, UpdateAmountPayload, UpdateDealPayload,
            UpdateStatusPayload,
        },
        party::{Buyer, NewBuyer},
    },
};

// CRUD do negócio. Os handlers são finos: validação de payload +
// delegação para o serviço; o recorte por papel acontece no serviço.

pub async fn list_deals(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Deal>>, AppError> {
    let deals = app_state.deal_service.list_deals(&user).await?;
    Ok(Json(deals))
}

pub async fn create_deal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateDealPayload>,
) -> Result<(StatusCode, Json<DealAggregate>), AppError> {
    let aggregate = app_state.deal_service.create_deal(&user, &payload).await?;
    Ok((StatusCode::CREATED, Json(aggregate)))
}

// GET /api/deals/{id}: o agregado completo { deal, owners, buyers,
// investors, expenses, documents } que a tela de detalhe consome
pub async fn get_deal(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<Json<DealAggregate>, AppError> {
    let aggregate = app_state.deal_service.get_aggregate(deal_id).await?;
    Ok(Json(aggregate))
}

pub async fn update_deal(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(payload): Json<UpdateDealPayload>,
) -> Result<Json<Deal>, AppError> {
    let deal = app_state.deal_service.update_deal(deal_id, &payload).await?;
    Ok(Json(deal))
}

pub async fn delete_deal(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Path(deal_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.deal_service.delete_deal(deal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// A transição de status é avançada de um lado só na tela (open ->
// closed), mas o backend aceita qualquer status válido: ele é a
// autoridade sobre o valor final.
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<Deal>, AppError> {
    let deal = app_state
        .deal_service
        .update_status(deal_id, payload.status)
        .await?;
    Ok(Json(deal))
}

pub async fn update_purchase_amount(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(payload): Json<UpdateAmountPayload>,
) -> Result<Json<Deal>, AppError> {
    let deal = app_state
        .deal_service
        .update_purchase_amount(deal_id, &payload)
        .await?;
    Ok(Json(deal))
}

pub async fn update_selling_amount(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(payload): Json<UpdateAmountPayload>,
) -> Result<Json<Deal>, AppError> {
    let deal = app_state
        .deal_service
        .update_sold_price(deal_id, &payload)
        .await?;
    Ok(Json(deal))
}

pub async fn add_buyer(
    State(app_state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(payload): Json<NewBuyer>,
) -> Result<(StatusCode, Json<Buyer>), AppError> {
    let buyer = app_state.deal_service.add_buyer(deal_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(buyer)))
}

pub async fn delete_buyer(
    State(app_state): State<AppState>,
    Path((deal_id, buyer_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    app_state.deal_service.delete_buyer(deal_id, buyer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
