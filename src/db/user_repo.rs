// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Cria um novo usuário, com tratamento específico para username duplicado
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        username: &str,
        password_hash: &str,
        full_name: Option<&str>,
        role: UserRole,
        owner_id: Option<i64>,
        investor_id: Option<i64>,
        mobile: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, full_name, role, owner_id, investor_id, mobile)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(full_name)
        .bind(role)
        .bind(owner_id)
        .bind(investor_id)
        .bind(mobile)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UsernameAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(user)
    }

    // Atualização parcial: campo None mantém o valor atual (COALESCE)
    #[allow(clippy::too_many_arguments)]
    pub async fn update_user(
        &self,
        id: i64,
        full_name: Option<&str>,
        role: Option<UserRole>,
        owner_id: Option<i64>,
        investor_id: Option<i64>,
        mobile: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                role = COALESCE($3, role),
                owner_id = COALESCE($4, owner_id),
                investor_id = COALESCE($5, investor_id),
                mobile = COALESCE($6, mobile),
                password_hash = COALESCE($7, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(full_name)
        .bind(role)
        .bind(owner_id)
        .bind(investor_id)
        .bind(mobile)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
