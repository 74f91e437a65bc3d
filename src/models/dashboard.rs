// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::deal::{Deal, DealStatus};

// Modelos da composição de dashboard: listagem paginada + estatísticas.
// O shape de `Pagination` é o mesmo que o front já consome.

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DealListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub year: Option<i32>,
    pub status: Option<DealStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub items_per_page: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedDeals {
    pub deals: Vec<Deal>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DealStats {
    pub total: i64,
    pub active: i64,
    pub closed: i64,
    pub commission: i64,
    // Anos com data de compra registrada, decrescente, para o filtro do dashboard
    pub years: Vec<i32>,
}
