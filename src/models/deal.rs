// src/models/deal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::money;
use crate::models::party::{Buyer, Investor, NewBuyer, NewInvestor, NewOwner, Owner};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Open,       // Em andamento
    Closed,     // Concluído
    Commission, // Negócio de comissão
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Deal {
    pub id: i64,

    #[schema(example = "Green Valley Plots")]
    pub project_name: String,
    pub survey_number: Option<String>,

    // Base de todos os cálculos de participação
    #[schema(example = "1000000.00")]
    pub purchase_amount: Option<Decimal>,
    pub sold_price: Option<Decimal>,

    pub status: DealStatus,
    pub purchase_date: Option<NaiveDate>,

    // Localização do terreno
    pub state: Option<String>,
    pub district: Option<String>,
    pub taluka: Option<String>,
    pub village: Option<String>,

    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Expense {
    pub id: i64,
    pub deal_id: i64,
    pub expense_type: Option<String>,
    pub amount: Option<Decimal>,
    // Referencia o investidor que pagou a despesa (id numérico cru,
    // resolvido para nome na montagem do agregado).
    pub paid_by: Option<i64>,
    pub description: Option<String>,
    pub expense_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Document {
    pub id: i64,
    pub deal_id: i64,
    pub document_type: Option<String>,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

// O agregado completo que o front consome na tela de detalhe.
// Mesmo formato do endpoint original: { deal, owners, buyers, ... }.
#[derive(Debug, Serialize, ToSchema)]
pub struct DealAggregate {
    pub deal: Deal,
    pub owners: Vec<Owner>,
    pub buyers: Vec<Buyer>,
    pub investors: Vec<Investor>,
    pub expenses: Vec<Expense>,
    pub documents: Vec<Document>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDealPayload {
    #[validate(length(min = 1, message = "Project name is required."))]
    pub project_name: String,
    pub survey_number: Option<String>,

    #[serde(default, deserialize_with = "money::lenient_option")]
    pub purchase_amount: Option<Decimal>,

    pub status: Option<DealStatus>,
    pub purchase_date: Option<NaiveDate>,

    pub state: Option<String>,
    pub district: Option<String>,
    pub taluka: Option<String>,
    pub village: Option<String>,

    // O negócio nasce com as partes aninhadas, como no formulário original
    #[serde(default)]
    pub owners: Vec<NewOwner>,
    #[serde(default)]
    pub investors: Vec<NewInvestor>,
    #[serde(default)]
    pub buyers: Vec<NewBuyer>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDealPayload {
    pub project_name: Option<String>,
    pub survey_number: Option<String>,

    #[serde(default, deserialize_with = "money::lenient_option")]
    pub purchase_amount: Option<Decimal>,

    pub status: Option<DealStatus>,
    pub purchase_date: Option<NaiveDate>,

    pub state: Option<String>,
    pub district: Option<String>,
    pub taluka: Option<String>,
    pub village: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: DealStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAmountPayload {
    // Aceita "₹1,00,000", "1000000" ou número JSON
    #[serde(default, deserialize_with = "money::lenient_option")]
    pub amount: Option<Decimal>,
}
