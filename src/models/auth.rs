// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Papéis fixos do sistema (herdados da tabela `users` legada):
// admin enxerga e edita tudo, auditor enxerga tudo, user só enxerga os
// negócios em que o investidor vinculado a ele participa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Auditor,
    User,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub full_name: Option<String>,
    pub role: UserRole,

    // Vínculos opcionais com os cadastros de proprietário/investidor,
    // usados pelo controle de acesso por papel.
    pub owner_id: Option<i64>,
    pub investor_id: Option<i64>,
    pub mobile: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserPayload {
    #[validate(length(min = 3, message = "Username must have at least 3 characters."))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
    pub full_name: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

// Resposta de autenticação com o token e os dados públicos do usuário
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

// Payloads da administração de usuários (somente admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[validate(length(min = 3, message = "Username must have at least 3 characters."))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub owner_id: Option<i64>,
    pub investor_id: Option<i64>,
    pub mobile: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserPayload {
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub owner_id: Option<i64>,
    pub investor_id: Option<i64>,
    pub mobile: Option<String>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // Subject (ID do usuário)
    pub username: String,
    pub role: UserRole,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
