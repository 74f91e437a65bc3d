// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::payment::{CreatePaymentPayload, Payment, PaymentWithDeal, UpdatePaymentPayload},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_deal(&self, deal_id: i64) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE deal_id = $1
            ORDER BY payment_date DESC NULLS LAST, id DESC
            "#,
        )
        .bind(deal_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    // Listagem global com o nome do negócio, respeitando o recorte de
    // visibilidade por investidor (papel `user`).
    pub async fn list_all_with_deal(
        &self,
        investor_id: Option<i64>,
    ) -> Result<Vec<PaymentWithDeal>, AppError> {
        let payments = sqlx::query_as::<_, PaymentWithDeal>(
            r#"
            SELECT p.*, d.project_name AS deal_name
            FROM payments p
            JOIN deals d ON d.id = p.deal_id
            WHERE ($1::bigint IS NULL
                   OR EXISTS (SELECT 1 FROM investors i WHERE i.deal_id = d.id AND i.id = $1))
            ORDER BY p.payment_date DESC NULLS LAST, p.id DESC
            "#,
        )
        .bind(investor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    pub async fn get(&self, deal_id: i64, payment_id: i64) -> Result<Option<Payment>, AppError> {
        let payment =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1 AND deal_id = $2")
                .bind(payment_id)
                .bind(deal_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(payment)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        deal_id: i64,
        amount: Decimal,
        status: &str,
        payload: &CreatePaymentPayload,
        created_by: Option<i64>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                deal_id, amount, payment_date, due_date, status,
                payment_type, payment_mode,
                paid_by, paid_to, paid_by_id, paid_to_id, paid_by_name, paid_to_name,
                description, reference, transaction_id, notes, category,
                payer_bank_name, payer_bank_account_no,
                receiver_bank_name, receiver_bank_account_no,
                created_by
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7,
                $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18,
                $19, $20, $21, $22,
                $23
            )
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .bind(amount)
        .bind(payload.payment_date)
        .bind(payload.due_date)
        .bind(status)
        .bind(&payload.payment_type)
        .bind(&payload.payment_mode)
        .bind(&payload.paid_by)
        .bind(&payload.paid_to)
        .bind(payload.paid_by_id)
        .bind(payload.paid_to_id)
        .bind(&payload.paid_by_name)
        .bind(&payload.paid_to_name)
        .bind(&payload.description)
        .bind(&payload.reference)
        .bind(&payload.transaction_id)
        .bind(&payload.notes)
        .bind(&payload.category)
        .bind(&payload.payer_bank_name)
        .bind(&payload.payer_bank_account_no)
        .bind(&payload.receiver_bank_name)
        .bind(&payload.receiver_bank_account_no)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    pub async fn update(
        &self,
        deal_id: i64,
        payment_id: i64,
        payload: &UpdatePaymentPayload,
    ) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET
                amount = COALESCE($3, amount),
                payment_date = COALESCE($4, payment_date),
                due_date = COALESCE($5, due_date),
                status = COALESCE($6, status),
                payment_type = COALESCE($7, payment_type),
                payment_mode = COALESCE($8, payment_mode),
                paid_by = COALESCE($9, paid_by),
                paid_to = COALESCE($10, paid_to),
                paid_by_id = COALESCE($11, paid_by_id),
                paid_to_id = COALESCE($12, paid_to_id),
                paid_by_name = COALESCE($13, paid_by_name),
                paid_to_name = COALESCE($14, paid_to_name),
                description = COALESCE($15, description),
                reference = COALESCE($16, reference),
                notes = COALESCE($17, notes),
                category = COALESCE($18, category)
            WHERE id = $1 AND deal_id = $2
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(deal_id)
        .bind(payload.amount)
        .bind(payload.payment_date)
        .bind(payload.due_date)
        .bind(&payload.status)
        .bind(&payload.payment_type)
        .bind(&payload.payment_mode)
        .bind(&payload.paid_by)
        .bind(&payload.paid_to)
        .bind(payload.paid_by_id)
        .bind(payload.paid_to_id)
        .bind(&payload.paid_by_name)
        .bind(&payload.paid_to_name)
        .bind(&payload.description)
        .bind(&payload.reference)
        .bind(&payload.notes)
        .bind(&payload.category)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    pub async fn delete(&self, deal_id: i64, payment_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1 AND deal_id = $2")
            .bind(payment_id)
            .bind(deal_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
