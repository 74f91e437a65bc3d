// src/services/user_service.rs

use bcrypt::hash;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, UpdateUserPayload, User, UserRole},
};

// Administração de usuários (rotas /admin, restritas ao papel admin).

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_all().await
    }

    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        let password = payload.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.repo
            .create_user(
                &self.pool,
                &payload.username,
                &password_hash,
                payload.full_name.as_deref(),
                payload.role.unwrap_or(UserRole::User),
                payload.owner_id,
                payload.investor_id,
                payload.mobile.as_deref(),
            )
            .await
    }

    pub async fn update_user(&self, id: i64, payload: &UpdateUserPayload) -> Result<User, AppError> {
        let password_hash = match &payload.password {
            Some(password) => {
                let password = password.clone();
                let hashed =
                    tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                        .await
                        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
                Some(hashed)
            }
            None => None,
        };

        self.repo
            .update_user(
                id,
                payload.full_name.as_deref(),
                payload.role,
                payload.owner_id,
                payload.investor_id,
                payload.mobile.as_deref(),
                password_hash.as_deref(),
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete_user(id).await? {
            Ok(())
        } else {
            Err(AppError::UserNotFound)
        }
    }
}
