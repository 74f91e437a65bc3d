// src/handlers/parties.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::party::{Investor, NewInvestor, NewOwner, Owner},
};

// Cadastros globais de proprietários e investidores (fora do detalhe do
// negócio). A criação avulsa ainda precisa apontar para um negócio.

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterOwnerPayload {
    pub deal_id: i64,
    #[validate(length(min = 1, message = "Owner name is required."))]
    pub name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInvestorPayload {
    pub deal_id: i64,
    #[serde(alias = "name")]
    #[validate(length(min = 1, message = "Investor name is required."))]
    pub investor_name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
}

// ---- Proprietários ----

pub async fn list_owners(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Owner>>, AppError> {
    let owners = app_state.party_repo.list_owners().await?;
    Ok(Json(owners))
}

pub async fn get_owner(
    State(app_state): State<AppState>,
    Path(owner_id): Path<i64>,
) -> Result<Json<Owner>, AppError> {
    app_state
        .party_repo
        .get_owner(owner_id)
        .await?
        .map(Json)
        .ok_or(AppError::PartyNotFound)
}

pub async fn create_owner(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterOwnerPayload>,
) -> Result<(StatusCode, Json<Owner>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let owner = NewOwner {
        name: payload.name,
        mobile: payload.mobile,
        aadhar_card: payload.aadhar_card,
        pan_card: payload.pan_card,
    };
    let created = app_state
        .party_repo
        .create_owner(payload.deal_id, &owner)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_owner(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Path(owner_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if app_state.party_repo.delete_owner(owner_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::PartyNotFound)
    }
}

// ---- Investidores ----

pub async fn list_investors(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Investor>>, AppError> {
    let investors = app_state.party_repo.list_investors().await?;
    Ok(Json(investors))
}

pub async fn get_investor(
    State(app_state): State<AppState>,
    Path(investor_id): Path<i64>,
) -> Result<Json<Investor>, AppError> {
    app_state
        .party_repo
        .get_investor(investor_id)
        .await?
        .map(Json)
        .ok_or(AppError::PartyNotFound)
}

pub async fn create_investor(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterInvestorPayload>,
) -> Result<(StatusCode, Json<Investor>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let investor = NewInvestor {
        investor_name: payload.investor_name,
        mobile: payload.mobile,
        aadhar_card: payload.aadhar_card,
        pan_card: payload.pan_card,
    };
    let created = app_state
        .party_repo
        .create_investor(payload.deal_id, &investor)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_investor(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Path(investor_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if app_state.party_repo.delete_investor(investor_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::PartyNotFound)
    }
}
