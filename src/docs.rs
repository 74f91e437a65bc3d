// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_deals_paginated,
        handlers::dashboard::get_deals_stats,

        // --- Shares ---
        handlers::shares::update_owner_shares,
        handlers::shares::update_investor_shares,

        // --- Tracking ---
        handlers::tracking::payment_tracking,
        handlers::tracking::deal_financials,

        // --- Payments ---
        handlers::payments::payments_ledger,
    ),
    components(
        schemas(
            // --- Deals / Dashboard ---
            models::deal::Deal,
            models::deal::DealStatus,
            models::deal::Expense,
            models::deal::Document,
            models::dashboard::Pagination,
            models::dashboard::PaginatedDeals,
            models::dashboard::DealStats,

            // --- Partes / Shares ---
            models::party::Owner,
            models::party::Investor,
            models::party::Buyer,
            models::party::ShareUpdate,
            models::party::OwnerSharesPayload,
            models::party::InvestorSharesPayload,
            models::party::SharesUpdatedResponse,

            // --- Payments / Tracking ---
            models::payment::Payment,
            models::tracking::OwnerTracking,
            models::tracking::InvestorTracking,
            models::tracking::PaymentTrackingResponse,
            models::tracking::DealFinancials,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Dashboard", description = "Paginação e estatísticas de negócios"),
        (name = "Shares", description = "Participações de proprietários e investidores"),
        (name = "Tracking", description = "Visões derivadas da conciliação de pagamentos"),
        (name = "Payments", description = "Razão de pagamentos"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
