// src/services/tracking_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{DealRepository, PaymentRepository},
    models::{
        party::NamedParty,
        tracking::{DealFinancials, InvestorTracking, OwnerTracking, PaymentTrackingResponse},
    },
    services::{
        allocation::{allocate_decimal, effective_percentage},
        reconciliation::{
            is_completed, recompute_party_totals, recompute_received_totals, PartyDirectory,
            PartyTotals,
        },
    },
};

// A visão de acompanhamento: alocador + conciliador compostos sobre o
// snapshot corrente do negócio. Nada daqui é gravado: a resposta é
// rederivada a cada chamada, e duas chamadas com o mesmo snapshot
// produzem exatamente a mesma saída.

#[derive(Clone)]
pub struct TrackingService {
    deals: DealRepository,
    payments: PaymentRepository,
}

impl TrackingService {
    pub fn new(deals: DealRepository, payments: PaymentRepository) -> Self {
        Self { deals, payments }
    }

    pub async fn payment_tracking(&self, deal_id: i64) -> Result<PaymentTrackingResponse, AppError> {
        let deal = self
            .deals
            .get(deal_id)
            .await?
            .ok_or(AppError::DealNotFound)?;

        let owners = self.deals.list_owners(deal_id).await?;
        let investors = self.deals.list_investors(deal_id).await?;
        let buyers = self.deals.list_buyers(deal_id).await?;
        let payments = self.payments.list_for_deal(deal_id).await?;

        let dir = PartyDirectory::new(&investors, &owners, &buyers);
        let purchase_amount = deal.purchase_amount.unwrap_or(Decimal::ZERO);

        // Totais derivados: investidores pelo lado pagador, proprietários
        // pelo lado recebedor.
        let invested = recompute_party_totals(&dir.investors, &payments, &dir);
        let received = recompute_received_totals(&dir.owners, &payments, &dir);

        let owner_summaries = owners
            .iter()
            .map(|owner| {
                let pct = effective_percentage(owners.len(), owner.percentage_share);
                let expected = allocate_decimal(pct, purchase_amount);
                let totals = find_totals(&received, owner.party_id());
                let remaining = (expected - totals.calculated_investment_amount).max(Decimal::ZERO);
                OwnerTracking {
                    owner_id: owner.id,
                    owner_name: owner.name.clone(),
                    percentage_share: pct,
                    expected_amount: expected,
                    total_received: totals.calculated_investment_amount,
                    remaining_amount: remaining,
                    payment_count: totals.payment_count,
                }
            })
            .collect();

        let investor_summaries = investors
            .iter()
            .map(|investor| {
                let committed = investor.investment_amount.unwrap_or(Decimal::ZERO);
                let totals = find_totals(&invested, investor.id);
                let remaining = (committed - totals.calculated_investment_amount).max(Decimal::ZERO);
                InvestorTracking {
                    investor_id: investor.id,
                    investor_name: investor.investor_name.clone(),
                    investment_amount: committed,
                    calculated_investment_amount: totals.calculated_investment_amount,
                    payment_count: totals.payment_count,
                    remaining_obligation: remaining,
                }
            })
            .collect();

        let total_payments = payments.iter().filter(|p| is_completed(&p.status)).count();

        Ok(PaymentTrackingResponse {
            deal_id,
            purchase_amount,
            owners: owner_summaries,
            investors: investor_summaries,
            total_payments,
        })
    }

    pub async fn financials(&self, deal_id: i64) -> Result<DealFinancials, AppError> {
        let deal = self
            .deals
            .get(deal_id)
            .await?
            .ok_or(AppError::DealNotFound)?;
        let payments = self.payments.list_for_deal(deal_id).await?;

        let mut total_invested = Decimal::ZERO;
        let mut completed = 0i64;
        let mut pending = 0i64;
        for payment in &payments {
            if is_completed(&payment.status) {
                total_invested += payment.amount;
                completed += 1;
            } else if payment.status == "pending" {
                pending += 1;
            }
        }

        Ok(DealFinancials {
            deal_id,
            purchase_amount: deal.purchase_amount,
            sold_price: deal.sold_price,
            total_invested,
            total_received: total_invested,
            completed_payments: completed,
            pending_payments: pending,
        })
    }
}

fn find_totals(totals: &[PartyTotals], party_id: i64) -> PartyTotals {
    totals
        .iter()
        .find(|t| t.party_id == party_id)
        .cloned()
        .unwrap_or(PartyTotals {
            party_id,
            calculated_investment_amount: Decimal::ZERO,
            payment_count: 0,
        })
}
