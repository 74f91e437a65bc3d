// src/services/payment_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{DealRepository, PartyRepository, PaymentRepository},
    models::{
        auth::User,
        payment::{
            CreatePaymentPayload, LedgerParams, Payment, PaymentWithDeal, UpdatePaymentPayload,
            PAYMENT_STATUSES,
        },
    },
    services::{
        deal_service::Visibility,
        ledger::{filter_and_sort, LedgerQuery},
        reconciliation::PartyDirectory,
    },
};

#[derive(Clone)]
pub struct PaymentService {
    payments: PaymentRepository,
    deals: DealRepository,
    parties: PartyRepository,
    pool: sqlx::PgPool,
}

impl PaymentService {
    pub fn new(
        payments: PaymentRepository,
        deals: DealRepository,
        parties: PartyRepository,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            payments,
            deals,
            parties,
            pool,
        }
    }

    pub async fn list_for_deal(&self, deal_id: i64) -> Result<Vec<Payment>, AppError> {
        if !self.deals.exists(deal_id).await? {
            return Err(AppError::DealNotFound);
        }
        self.payments.list_for_deal(deal_id).await
    }

    pub async fn list_all(&self, user: &User) -> Result<Vec<PaymentWithDeal>, AppError> {
        match Visibility::for_user(user) {
            Visibility::Nothing => Ok(Vec::new()),
            vis => self.payments.list_all_with_deal(vis.investor_filter()).await,
        }
    }

    /// Razão filtrado/ordenado. O pipeline em si é puro; aqui só se
    /// monta o snapshot (pagamentos + diretório de partes) e se ancora
    /// o instante de avaliação.
    pub async fn ledger(&self, user: &User, params: &LedgerParams) -> Result<Vec<Payment>, AppError> {
        let (payments, dir) = match params.deal_id {
            Some(deal_id) => {
                let payments = self.list_for_deal(deal_id).await?;
                let dir = self.deal_directory(deal_id).await?;
                (payments, dir)
            }
            None => {
                let payments = self
                    .list_all(user)
                    .await?
                    .into_iter()
                    .map(|p| p.payment)
                    .collect();
                (payments, self.global_directory().await?)
            }
        };

        let query = LedgerQuery::from_params(params, &dir);
        Ok(filter_and_sort(payments, &query, &dir, Utc::now()))
    }

    pub async fn get(&self, deal_id: i64, payment_id: i64) -> Result<Payment, AppError> {
        self.payments
            .get(deal_id, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)
    }

    pub async fn create(
        &self,
        user: &User,
        deal_id: i64,
        payload: &CreatePaymentPayload,
    ) -> Result<Payment, AppError> {
        payload.validate()?;
        if !self.deals.exists(deal_id).await? {
            return Err(AppError::DealNotFound);
        }

        let status = validate_status(payload.status.as_deref())?;
        let amount = payload.amount.unwrap_or(Decimal::ZERO);

        self.payments
            .create(&self.pool, deal_id, amount, status, payload, Some(user.id))
            .await
    }

    pub async fn update(
        &self,
        deal_id: i64,
        payment_id: i64,
        payload: &UpdatePaymentPayload,
    ) -> Result<Payment, AppError> {
        payload.validate()?;
        if let Some(status) = payload.status.as_deref() {
            validate_status(Some(status))?;
        }
        self.payments
            .update(deal_id, payment_id, payload)
            .await?
            .ok_or(AppError::PaymentNotFound)
    }

    pub async fn delete(&self, deal_id: i64, payment_id: i64) -> Result<(), AppError> {
        if self.payments.delete(deal_id, payment_id).await? {
            Ok(())
        } else {
            Err(AppError::PaymentNotFound)
        }
    }

    // Diretório canônico das partes de um negócio: tudo que a
    // resolução de nomes enxerga sai normalizado daqui.
    pub async fn deal_directory(&self, deal_id: i64) -> Result<PartyDirectory, AppError> {
        let investors = self.deals.list_investors(deal_id).await?;
        let owners = self.deals.list_owners(deal_id).await?;
        let buyers = self.deals.list_buyers(deal_id).await?;
        Ok(PartyDirectory::new(&investors, &owners, &buyers))
    }

    async fn global_directory(&self) -> Result<PartyDirectory, AppError> {
        let investors = self.parties.list_investors().await?;
        let owners = self.parties.list_owners().await?;
        let buyers = self.parties.list_buyers().await?;
        Ok(PartyDirectory::new(&investors, &owners, &buyers))
    }
}

fn validate_status(status: Option<&str>) -> Result<&str, AppError> {
    match status {
        None => Ok("pending"),
        Some(s) if PAYMENT_STATUSES.contains(&s) => Ok(s),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid payment status '{other}'. Expected one of: {}.",
            PAYMENT_STATUSES.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending_and_rejects_unknown_values() {
        assert_eq!(validate_status(None).unwrap(), "pending");
        assert_eq!(validate_status(Some("completed")).unwrap(), "completed");
        // "overdue" é derivado, nunca gravado
        assert!(validate_status(Some("overdue")).is_err());
        assert!(validate_status(Some("paid")).is_err());
    }
}
