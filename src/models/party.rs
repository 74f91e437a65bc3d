// src/models/party.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// As três coleções de partes de um negócio. O legado usa `name` para
// proprietários/compradores e `investor_name` para investidores; os
// structs preservam os nomes de coluna e o trait `NamedParty` entrega a
// forma canônica (display_name) para a camada de conciliação.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Owner {
    pub id: i64,
    pub deal_id: i64,
    #[serde(alias = "owner_name")]
    pub name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
    pub percentage_share: Option<Decimal>,
    pub investment_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Investor {
    pub id: i64,
    pub deal_id: i64,
    #[serde(alias = "name")]
    pub investor_name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
    pub percentage_share: Option<Decimal>,
    pub investment_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Buyer {
    pub id: i64,
    pub deal_id: i64,
    pub name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
}

/// Forma canônica de uma parte para a conciliação: id + nome de
/// exibição, sem as variantes de campo do legado.
pub trait NamedParty {
    fn party_id(&self) -> i64;
    fn display_name(&self) -> &str;
    fn percentage_share(&self) -> Option<Decimal>;
}

impl NamedParty for Owner {
    fn party_id(&self) -> i64 {
        self.id
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn percentage_share(&self) -> Option<Decimal> {
        self.percentage_share
    }
}

impl NamedParty for Investor {
    fn party_id(&self) -> i64 {
        self.id
    }
    fn display_name(&self) -> &str {
        &self.investor_name
    }
    fn percentage_share(&self) -> Option<Decimal> {
        self.percentage_share
    }
}

impl NamedParty for Buyer {
    fn party_id(&self) -> i64 {
        self.id
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn percentage_share(&self) -> Option<Decimal> {
        None
    }
}

// --- Payloads de criação (aninhados no POST /deals e nos cadastros) ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewOwner {
    #[validate(length(min = 1, message = "Owner name is required."))]
    pub name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewInvestor {
    #[serde(alias = "name")]
    #[validate(length(min = 1, message = "Investor name is required."))]
    pub investor_name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBuyer {
    #[validate(length(min = 1, message = "Buyer name is required."))]
    pub name: String,
    pub mobile: Option<String>,
    pub aadhar_card: Option<String>,
    pub pan_card: Option<String>,
}

// --- Corpo do PUT de participações (owner-shares / investor-shares) ---

// Ambos os campos já chegam arredondados para inteiro pelo cliente;
// o servidor re-valida e faz clamp por conta própria.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareUpdate {
    pub id: i64,
    pub percentage_share: i64,
    pub investment_amount: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OwnerSharesPayload {
    pub owners: Vec<ShareUpdate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvestorSharesPayload {
    pub investors: Vec<ShareUpdate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SharesUpdatedResponse {
    pub success: bool,
    pub message: String,
    pub updated: usize,
}
