pub mod allocation;
pub mod auth;
pub mod deal_service;
pub mod ledger;
pub mod payment_service;
pub mod reconciliation;
pub mod share_service;
pub mod tracking_service;
pub mod user_service;
