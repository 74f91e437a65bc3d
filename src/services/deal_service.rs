// src/services/deal_service.rs

use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::DealRepository,
    models::{
        auth::{User, UserRole},
        dashboard::{DealListQuery, DealStats, PaginatedDeals, Pagination},
        deal::{
            CreateDealPayload, Deal, DealAggregate, DealStatus, UpdateAmountPayload,
            UpdateDealPayload,
        },
        party::{Buyer, NewBuyer},
    },
};

const DEFAULT_PAGE_SIZE: i64 = 5;
const MAX_PAGE_SIZE: i64 = 100;

/// Recorte de visibilidade por papel: admin e auditor enxergam tudo;
/// o papel `user` só enxerga os negócios do investidor vinculado, e sem
/// vínculo não enxerga nada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    InvestorOnly(i64),
    Nothing,
}

impl Visibility {
    pub fn for_user(user: &User) -> Self {
        match user.role {
            UserRole::Admin | UserRole::Auditor => Visibility::All,
            UserRole::User => match user.investor_id {
                Some(id) => Visibility::InvestorOnly(id),
                None => Visibility::Nothing,
            },
        }
    }

    pub fn investor_filter(&self) -> Option<i64> {
        match self {
            Visibility::InvestorOnly(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct DealService {
    repo: DealRepository,
    pool: PgPool,
}

impl DealService {
    pub fn new(repo: DealRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_deals(&self, user: &User) -> Result<Vec<Deal>, AppError> {
        match Visibility::for_user(user) {
            Visibility::Nothing => Ok(Vec::new()),
            vis => self.repo.list_all(vis.investor_filter()).await,
        }
    }

    pub async fn list_paginated(
        &self,
        user: &User,
        query: &DealListQuery,
    ) -> Result<PaginatedDeals, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let vis = Visibility::for_user(user);
        if vis == Visibility::Nothing {
            return Ok(PaginatedDeals {
                deals: Vec::new(),
                pagination: Pagination {
                    current_page: page,
                    total_pages: 0,
                    total_count: 0,
                    items_per_page: limit,
                    has_next_page: false,
                    has_prev_page: false,
                },
            });
        }

        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let total_count = self
            .repo
            .count_filtered(vis.investor_filter(), query.year, query.status, search)
            .await?;
        let deals = self
            .repo
            .list_paginated(
                vis.investor_filter(),
                query.year,
                query.status,
                search,
                limit,
                (page - 1) * limit,
            )
            .await?;

        // Divisão com teto para o total de páginas
        let total_pages = (total_count + limit - 1) / limit;

        Ok(PaginatedDeals {
            deals,
            pagination: Pagination {
                current_page: page,
                total_pages,
                total_count,
                items_per_page: limit,
                has_next_page: page < total_pages,
                has_prev_page: page > 1,
            },
        })
    }

    pub async fn stats(&self, user: &User) -> Result<DealStats, AppError> {
        let vis = Visibility::for_user(user);
        if vis == Visibility::Nothing {
            return Ok(DealStats {
                total: 0,
                active: 0,
                closed: 0,
                commission: 0,
                years: Vec::new(),
            });
        }

        let (total, active, closed, commission) =
            self.repo.status_counts(vis.investor_filter()).await?;
        let years = self.repo.purchase_years(vis.investor_filter()).await?;

        Ok(DealStats {
            total,
            active,
            closed,
            commission,
            years,
        })
    }

    pub async fn get_aggregate(&self, deal_id: i64) -> Result<DealAggregate, AppError> {
        let deal = self.repo.get(deal_id).await?.ok_or(AppError::DealNotFound)?;

        let owners = self.repo.list_owners(deal_id).await?;
        let buyers = self.repo.list_buyers(deal_id).await?;
        let investors = self.repo.list_investors(deal_id).await?;
        let expenses = self.repo.list_expenses(deal_id).await?;
        let documents = self.repo.list_documents(deal_id).await?;

        Ok(DealAggregate {
            deal,
            owners,
            buyers,
            investors,
            expenses,
            documents,
        })
    }

    // Criação transacional: o negócio e as partes aninhadas entram
    // juntos ou nada entra.
    pub async fn create_deal(
        &self,
        user: &User,
        payload: &CreateDealPayload,
    ) -> Result<DealAggregate, AppError> {
        payload.validate()?;
        for owner in &payload.owners {
            owner.validate()?;
        }
        for investor in &payload.investors {
            investor.validate()?;
        }
        for buyer in &payload.buyers {
            buyer.validate()?;
        }

        let mut tx = self.pool.begin().await?;

        let deal = self
            .repo
            .create_deal(
                &mut *tx,
                &payload.project_name,
                payload.survey_number.as_deref(),
                payload.purchase_amount,
                payload.status.unwrap_or(DealStatus::Open),
                payload.purchase_date,
                payload.state.as_deref(),
                payload.district.as_deref(),
                payload.taluka.as_deref(),
                payload.village.as_deref(),
                Some(user.id),
            )
            .await?;

        let mut owners = Vec::with_capacity(payload.owners.len());
        for owner in &payload.owners {
            owners.push(self.repo.insert_owner(&mut *tx, deal.id, owner).await?);
        }
        let mut investors = Vec::with_capacity(payload.investors.len());
        for investor in &payload.investors {
            investors.push(self.repo.insert_investor(&mut *tx, deal.id, investor).await?);
        }
        let mut buyers = Vec::with_capacity(payload.buyers.len());
        for buyer in &payload.buyers {
            buyers.push(self.repo.insert_buyer(&mut *tx, deal.id, buyer).await?);
        }

        tx.commit().await?;

        tracing::info!("✅ Negócio {} criado com {} partes", deal.id, owners.len() + investors.len() + buyers.len());

        Ok(DealAggregate {
            deal,
            owners,
            buyers,
            investors,
            expenses: Vec::new(),
            documents: Vec::new(),
        })
    }

    pub async fn update_deal(
        &self,
        deal_id: i64,
        payload: &UpdateDealPayload,
    ) -> Result<Deal, AppError> {
        payload.validate()?;
        self.repo
            .update_deal(
                deal_id,
                payload.project_name.as_deref(),
                payload.survey_number.as_deref(),
                payload.purchase_amount,
                payload.status,
                payload.purchase_date,
                payload.state.as_deref(),
                payload.district.as_deref(),
                payload.taluka.as_deref(),
                payload.village.as_deref(),
            )
            .await?
            .ok_or(AppError::DealNotFound)
    }

    pub async fn update_status(&self, deal_id: i64, status: DealStatus) -> Result<Deal, AppError> {
        self.repo
            .update_status(deal_id, status)
            .await?
            .ok_or(AppError::DealNotFound)
    }

    pub async fn update_purchase_amount(
        &self,
        deal_id: i64,
        payload: &UpdateAmountPayload,
    ) -> Result<Deal, AppError> {
        self.repo
            .update_purchase_amount(deal_id, payload.amount)
            .await?
            .ok_or(AppError::DealNotFound)
    }

    pub async fn update_sold_price(
        &self,
        deal_id: i64,
        payload: &UpdateAmountPayload,
    ) -> Result<Deal, AppError> {
        self.repo
            .update_sold_price(deal_id, payload.amount)
            .await?
            .ok_or(AppError::DealNotFound)
    }

    pub async fn delete_deal(&self, deal_id: i64) -> Result<(), AppError> {
        if self.repo.delete_deal(deal_id).await? {
            Ok(())
        } else {
            Err(AppError::DealNotFound)
        }
    }

    pub async fn add_buyer(&self, deal_id: i64, buyer: &NewBuyer) -> Result<Buyer, AppError> {
        buyer.validate()?;
        if !self.repo.exists(deal_id).await? {
            return Err(AppError::DealNotFound);
        }
        self.repo.insert_buyer(&self.pool, deal_id, buyer).await
    }

    pub async fn delete_buyer(&self, deal_id: i64, buyer_id: i64) -> Result<(), AppError> {
        if self.repo.delete_buyer(deal_id, buyer_id).await? {
            Ok(())
        } else {
            Err(AppError::PartyNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn user(role: UserRole, investor_id: Option<i64>) -> User {
        User {
            id: 1,
            username: "u".to_string(),
            password_hash: String::new(),
            full_name: None,
            role,
            owner_id: None,
            investor_id,
            mobile: None,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn visibility_follows_role_and_investor_link() {
        assert_eq!(
            Visibility::for_user(&user(UserRole::Admin, None)),
            Visibility::All
        );
        assert_eq!(
            Visibility::for_user(&user(UserRole::Auditor, Some(9))),
            Visibility::All
        );
        assert_eq!(
            Visibility::for_user(&user(UserRole::User, Some(9))),
            Visibility::InvestorOnly(9)
        );
        assert_eq!(
            Visibility::for_user(&user(UserRole::User, None)),
            Visibility::Nothing
        );
    }
}
