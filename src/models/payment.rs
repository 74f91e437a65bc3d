// src/models/payment.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::money;

// Status canônicos de um pagamento. "overdue" NÃO entra aqui: é um
// estado derivado (pending + due_date vencida), nunca gravado.
pub const PAYMENT_STATUSES: [&str; 4] = ["pending", "completed", "cancelled", "failed"];

// O registro de pagamento como sai do banco. `status` fica como texto:
// a base herdada carrega valores fora do vocabulário atual e a
// conciliação precisa degradá-los com segurança em vez de falhar no decode.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: i64,
    pub deal_id: i64,

    #[schema(example = "50000.00")]
    pub amount: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,

    #[schema(example = "pending")]
    pub status: String,
    pub payment_type: Option<String>,
    pub payment_mode: Option<String>,

    // Identidade de pagador/recebedor em três formas possíveis:
    // nome pré-resolvido, token "{tipo}_{id}" ou id numérico cru.
    pub paid_by: Option<String>,
    pub paid_to: Option<String>,
    pub paid_by_id: Option<i64>,
    pub paid_to_id: Option<i64>,
    pub paid_by_name: Option<String>,
    pub paid_to_name: Option<String>,

    pub description: Option<String>,
    pub reference: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,

    pub payer_bank_name: Option<String>,
    pub payer_bank_account_no: Option<String>,
    pub receiver_bank_name: Option<String>,
    pub receiver_bank_account_no: Option<String>,

    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// Pagamento + nome do negócio, para a listagem global de pagamentos
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PaymentWithDeal {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,
    pub deal_name: String,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentPayload {
    // Tolerante: número, string formatada ou lixo (vira 0, mas o
    // registro continua contando na conciliação)
    #[serde(default, deserialize_with = "money::lenient_option")]
    pub amount: Option<Decimal>,

    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub payment_type: Option<String>,
    pub payment_mode: Option<String>,

    pub paid_by: Option<String>,
    pub paid_to: Option<String>,
    pub paid_by_id: Option<i64>,
    pub paid_to_id: Option<i64>,
    pub paid_by_name: Option<String>,
    pub paid_to_name: Option<String>,

    pub description: Option<String>,
    pub reference: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,

    pub payer_bank_name: Option<String>,
    pub payer_bank_account_no: Option<String>,
    pub receiver_bank_name: Option<String>,
    pub receiver_bank_account_no: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentPayload {
    #[serde(default, deserialize_with = "money::lenient_option")]
    pub amount: Option<Decimal>,

    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub payment_type: Option<String>,
    pub payment_mode: Option<String>,

    pub paid_by: Option<String>,
    pub paid_to: Option<String>,
    pub paid_by_id: Option<i64>,
    pub paid_to_id: Option<i64>,
    pub paid_by_name: Option<String>,
    pub paid_to_name: Option<String>,

    pub description: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

// Parâmetros crus da query string do razão de pagamentos.
// A tradução para os tipos do pipeline fica em `services::ledger`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct LedgerParams {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub payment_type: Option<String>,
    pub date_range: Option<String>,
    pub investor_id: Option<i64>,
    pub sort_by: Option<String>,
    pub deal_id: Option<i64>,
}
