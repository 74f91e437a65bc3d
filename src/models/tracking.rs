// src/models/tracking.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Shapes de resposta das visões de conciliação (payment-tracking e
// financials). Tudo aqui é derivado na hora, a partir do snapshot de
// pagamentos; nada disto é fonte de verdade.

#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerTracking {
    pub owner_id: i64,
    pub owner_name: String,
    pub percentage_share: Decimal,
    // purchase_amount * percentual / 100, sem arredondamento
    pub expected_amount: Decimal,
    pub total_received: Decimal,
    pub remaining_amount: Decimal,
    pub payment_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvestorTracking {
    pub investor_id: i64,
    pub investor_name: String,
    pub investment_amount: Decimal,
    // Recalculado do razão a cada chamada; espelho de
    // calculated_investment_amount da tela de detalhe
    pub calculated_investment_amount: Decimal,
    pub payment_count: i64,
    pub remaining_obligation: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentTrackingResponse {
    pub deal_id: i64,
    pub purchase_amount: Decimal,
    pub owners: Vec<OwnerTracking>,
    pub investors: Vec<InvestorTracking>,
    pub total_payments: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DealFinancials {
    pub deal_id: i64,
    pub purchase_amount: Option<Decimal>,
    pub sold_price: Option<Decimal>,
    pub total_invested: Decimal,
    pub total_received: Decimal,
    pub completed_payments: i64,
    pub pending_payments: i64,
}
