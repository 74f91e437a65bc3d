// src/db/party_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::party::{Buyer, Investor, NewInvestor, NewOwner, Owner},
};

// Cadastros globais de proprietários e investidores (as telas de
// listagem fora do detalhe do negócio).
#[derive(Clone)]
pub struct PartyRepository {
    pool: PgPool,
}

impl PartyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---- Proprietários ----

    pub async fn list_owners(&self) -> Result<Vec<Owner>, AppError> {
        let owners = sqlx::query_as::<_, Owner>("SELECT * FROM owners ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(owners)
    }

    pub async fn get_owner(&self, owner_id: i64) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    pub async fn create_owner(&self, deal_id: i64, owner: &NewOwner) -> Result<Owner, AppError> {
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
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_owner(&self, owner_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM owners WHERE id = $1")
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- Investidores ----

    pub async fn list_investors(&self) -> Result<Vec<Investor>, AppError> {
        let investors =
            sqlx::query_as::<_, Investor>("SELECT * FROM investors ORDER BY investor_name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(investors)
    }

    pub async fn get_investor(&self, investor_id: i64) -> Result<Option<Investor>, AppError> {
        let investor = sqlx::query_as::<_, Investor>("SELECT * FROM investors WHERE id = $1")
            .bind(investor_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(investor)
    }

    pub async fn create_investor(
        &self,
        deal_id: i64,
        investor: &NewInvestor,
    ) -> Result<Investor, AppError> {
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
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_investor(&self, investor_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM investors WHERE id = $1")
            .bind(investor_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- Compradores (só para o diretório global de resolução) ----

    pub async fn list_buyers(&self) -> Result<Vec<Buyer>, AppError> {
        let buyers = sqlx::query_as::<_, Buyer>("SELECT * FROM buyers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(buyers)
    }
}
