// src/db/deal_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        deal::{Deal, DealStatus, Document, Expense},
        party::{Buyer, Investor, NewBuyer, NewInvestor, NewOwner, Owner, ShareUpdate},
    },
};

#[derive(Clone)]
pub struct DealRepository {
    pool: PgPool,
}

impl DealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA / LISTAGEM
    // =========================================================================

    pub async fn exists(&self, deal_id: i64) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM deals WHERE id = $1")
            .bind(deal_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn get(&self, deal_id: i64) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = $1")
            .bind(deal_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deal)
    }

    // Listagem simples, com o recorte de visibilidade por investidor
    // (papel `user`): quando `investor_id` vem preenchido, só aparecem
    // os negócios em que aquele investidor participa.
    pub async fn list_all(&self, investor_id: Option<i64>) -> Result<Vec<Deal>, AppError> {
        let deals = sqlx::query_as::<_, Deal>(
            r#"
            SELECT * FROM deals d
            WHERE ($1::bigint IS NULL
                   OR EXISTS (SELECT 1 FROM investors i WHERE i.deal_id = d.id AND i.id = $1))
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(investor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(deals)
    }

    // Paginação com filtros opcionais. Filtro ausente vira bind NULL,
    // mantendo a query estática (sem SQL dinâmico).
    #[allow(clippy::too_many_arguments)]
    pub async fn list_paginated(
        &self,
        investor_id: Option<i64>,
        year: Option<i32>,
        status: Option<DealStatus>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Deal>, AppError> {
        let pattern = search.map(|s| format!("%{s}%"));
        let deals = sqlx::query_as::<_, Deal>(
            r#"
            SELECT * FROM deals d
            WHERE ($1::bigint IS NULL
                   OR EXISTS (SELECT 1 FROM investors i WHERE i.deal_id = d.id AND i.id = $1))
              AND ($2::int IS NULL OR EXTRACT(YEAR FROM d.purchase_date)::int = $2)
              AND ($3::deal_status IS NULL OR d.status = $3)
              AND ($4::text IS NULL
                   OR d.project_name ILIKE $4
                   OR d.survey_number ILIKE $4
                   OR d.village ILIKE $4
                   OR d.taluka ILIKE $4
                   OR CAST(d.id AS TEXT) LIKE $4
                   OR d.status::text ILIKE $4
                   OR to_char(d.purchase_date, 'YYYY-MM-DD') LIKE $4)
            ORDER BY d.created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(investor_id)
        .bind(year)
        .bind(status)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(deals)
    }

    pub async fn count_filtered(
        &self,
        investor_id: Option<i64>,
        year: Option<i32>,
        status: Option<DealStatus>,
        search: Option<&str>,
    ) -> Result<i64, AppError> {
        let pattern = search.map(|s| format!("%{s}%"));
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM deals d
            WHERE ($1::bigint IS NULL
                   OR EXISTS (SELECT 1 FROM investors i WHERE i.deal_id = d.id AND i.id = $1))
              AND ($2::int IS NULL OR EXTRACT(YEAR FROM d.purchase_date)::int = $2)
              AND ($3::deal_status IS NULL OR d.status = $3)
              AND ($4::text IS NULL
                   OR d.project_name ILIKE $4
                   OR d.survey_number ILIKE $4
                   OR d.village ILIKE $4
                   OR d.taluka ILIKE $4
                   OR CAST(d.id AS TEXT) LIKE $4
                   OR d.status::text ILIKE $4
                   OR to_char(d.purchase_date, 'YYYY-MM-DD') LIKE $4)
            "#,
        )
        .bind(investor_id)
        .bind(year)
        .bind(status)
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // Estatísticas do dashboard em uma query só (FILTER do Postgres)
    pub async fn status_counts(
        &self,
        investor_id: Option<i64>,
    ) -> Result<(i64, i64, i64, i64), AppError> {
        let counts = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE d.status = 'open'),
                COUNT(*) FILTER (WHERE d.status = 'closed'),
                COUNT(*) FILTER (WHERE d.status = 'commission')
            FROM deals d
            WHERE ($1::bigint IS NULL
                   OR EXISTS (SELECT 1 FROM investors i WHERE i.deal_id = d.id AND i.id = $1))
            "#,
        )
        .bind(investor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    pub async fn purchase_years(&self, investor_id: Option<i64>) -> Result<Vec<i32>, AppError> {
        let years = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT EXTRACT(YEAR FROM d.purchase_date)::int
            FROM deals d
            WHERE d.purchase_date IS NOT NULL
              AND ($1::bigint IS NULL
                   OR EXISTS (SELECT 1 FROM investors i WHERE i.deal_id = d.id AND i.id = $1))
            ORDER BY 1 DESC
            "#,
        )
        .bind(investor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(years)
    }

    // =========================================================================
    //  AGREGADO DO NEGÓCIO (partes, despesas, documentos)
    // =========================================================================

    pub async fn list_owners(&self, deal_id: i64) -> Result<Vec<Owner>, AppError> {
        let owners =
            sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE deal_id = $1 ORDER BY id")
                .bind(deal_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(owners)
    }

    pub async fn list_investors(&self, deal_id: i64) -> Result<Vec<Investor>, AppError> {
        let investors =
            sqlx::query_as::<_, Investor>("SELECT * FROM investors WHERE deal_id = $1 ORDER BY id")
                .bind(deal_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(investors)
    }

    pub async fn list_buyers(&self, deal_id: i64) -> Result<Vec<Buyer>, AppError> {
        let buyers =
            sqlx::query_as::<_, Buyer>("SELECT * FROM buyers WHERE deal_id = $1 ORDER BY id")
                .bind(deal_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(buyers)
    }

    pub async fn list_expenses(&self, deal_id: i64) -> Result<Vec<Expense>, AppError> {
        let expenses =
            sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE deal_id = $1 ORDER BY id")
                .bind(deal_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(expenses)
    }

    pub async fn list_documents(&self, deal_id: i64) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE deal_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(deal_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn create_deal<'e, E>(
        &self,
        executor: E,
        project_name: &str,
        survey_number: Option<&str>,
        purchase_amount: Option<Decimal>,
        status: DealStatus,
        purchase_date: Option<NaiveDate>,
        state: Option<&str>,
        district: Option<&str>,
        taluka: Option<&str>,
        village: Option<&str>,
        created_by: Option<i64>,
    ) -> Result<Deal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (
                project_name, survey_number, purchase_amount, status, purchase_date,
                state, district, taluka, village, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(project_name)
        .bind(survey_number)
        .bind(purchase_amount)
        .bind(status)
        .bind(purchase_date)
        .bind(state)
        .bind(district)
        .bind(taluka)
        .bind(village)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(deal)
    }

    pub async fn insert_owner<'e, E>(
        &self,
        executor: E,
        deal_id: i64,
        owner: &NewOwner,
    ) -> Result<Owner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Owner>(
            r#"
            INSERT INTO owners (deal_id, name, mobile, aadhar_card, pan_card)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .bind(&owner.name)
        .bind(&owner.mobile)
        .bind(&owner.aadhar_card)
        .bind(&owner.pan_card)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn insert_investor<'e, E>(
        &self,
        executor: E,
        deal_id: i64,
        investor: &NewInvestor,
    ) -> Result<Investor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Investor>(
            r#"
            INSERT INTO investors (deal_id, investor_name, mobile, aadhar_card, pan_card)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .bind(&investor.investor_name)
        .bind(&investor.mobile)
        .bind(&investor.aadhar_card)
        .bind(&investor.pan_card)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn insert_buyer<'e, E>(
        &self,
        executor: E,
        deal_id: i64,
        buyer: &NewBuyer,
    ) -> Result<Buyer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Buyer>(
            r#"
            INSERT INTO buyers (deal_id, name, mobile, aadhar_card, pan_card)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .bind(&buyer.name)
        .bind(&buyer.mobile)
        .bind(&buyer.aadhar_card)
        .bind(&buyer.pan_card)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_deal(
        &self,
        deal_id: i64,
        project_name: Option<&str>,
        survey_number: Option<&str>,
        purchase_amount: Option<Decimal>,
        status: Option<DealStatus>,
        purchase_date: Option<NaiveDate>,
        state: Option<&str>,
        district: Option<&str>,
        taluka: Option<&str>,
        village: Option<&str>,
    ) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals SET
                project_name = COALESCE($2, project_name),
                survey_number = COALESCE($3, survey_number),
                purchase_amount = COALESCE($4, purchase_amount),
                status = COALESCE($5, status),
                purchase_date = COALESCE($6, purchase_date),
                state = COALESCE($7, state),
                district = COALESCE($8, district),
                taluka = COALESCE($9, taluka),
                village = COALESCE($10, village),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .bind(project_name)
        .bind(survey_number)
        .bind(purchase_amount)
        .bind(status)
        .bind(purchase_date)
        .bind(state)
        .bind(district)
        .bind(taluka)
        .bind(village)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deal)
    }

    pub async fn update_status(
        &self,
        deal_id: i64,
        status: DealStatus,
    ) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            "UPDATE deals SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(deal_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deal)
    }

    pub async fn update_purchase_amount(
        &self,
        deal_id: i64,
        amount: Option<Decimal>,
    ) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            "UPDATE deals SET purchase_amount = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(deal_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deal)
    }

    pub async fn update_sold_price(
        &self,
        deal_id: i64,
        amount: Option<Decimal>,
    ) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            "UPDATE deals SET sold_price = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(deal_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deal)
    }

    // O ON DELETE CASCADE do schema remove partes, pagamentos, despesas
    // e documentos junto com o negócio.
    pub async fn delete_deal(&self, deal_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(deal_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_buyer(&self, deal_id: i64, buyer_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM buyers WHERE id = $1 AND deal_id = $2")
            .bind(buyer_id)
            .bind(deal_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PARTICIPAÇÕES (owner-shares / investor-shares)
    // =========================================================================

    // Só atualiza se a parte pertence ao negócio; linha alheia é
    // silenciosamente ignorada, como no comportamento original.
    pub async fn update_owner_share<'e, E>(
        &self,
        executor: E,
        deal_id: i64,
        share: &ShareUpdate,
        percentage: Decimal,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE owners SET percentage_share = $3, investment_amount = $4
            WHERE id = $1 AND deal_id = $2
            "#,
        )
        .bind(share.id)
        .bind(deal_id)
        .bind(percentage)
        .bind(Decimal::from(share.investment_amount))
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_investor_share<'e, E>(
        &self,
        executor: E,
        deal_id: i64,
        share: &ShareUpdate,
        percentage: Decimal,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE investors SET percentage_share = $3, investment_amount = $4
            WHERE id = $1 AND deal_id = $2
            "#,
        )
        .bind(share.id)
        .bind(deal_id)
        .bind(percentage)
        .bind(Decimal::from(share.investment_amount))
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
