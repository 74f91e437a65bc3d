// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User, UserRole},
};

// Geração/validação de token isolada em funções livres para poder ser
// testada sem banco.

pub fn generate_token(user: &User, jwt_secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(24);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?)
}

pub fn decode_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;
    Ok(token_data.claims)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: sqlx::PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: sqlx::PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
        full_name: Option<String>,
    ) -> Result<(String, User), AppError> {
        // Hashing fora do runtime async (bcrypt é caro de CPU)
        let password_clone = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Auto-registro sempre nasce com o papel mais restrito;
        // promoção a admin/auditor é tarefa da administração de usuários.
        let user = self
            .user_repo
            .create_user(
                &self.pool,
                username,
                &password_hash,
                full_name.as_deref(),
                UserRole::User,
                None,
                None,
                None,
            )
            .await?;

        let token = generate_token(&user, &self.jwt_secret)?;
        Ok((token, user))
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em uma thread separada
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_token(&user, &self.jwt_secret)?;
        Ok((token, user))
    }

    // O token carrega username/role, mas o usuário é sempre re-lido do
    // banco: papel rebaixado ou conta removida invalida o acesso na hora.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(token, &self.jwt_secret)?;
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn user() -> User {
        User {
            id: 42,
            username: "asha".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            full_name: Some("Asha Patel".to_string()),
            role: UserRole::Admin,
            owner_id: None,
            investor_id: None,
            mobile: None,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn token_round_trip_preserves_identity_and_role() {
        let token = generate_token(&user(), "test-secret").unwrap();
        let claims = decode_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "asha");
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = generate_token(&user(), "test-secret").unwrap();
        let err = decode_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = decode_token("not-a-jwt", "test-secret").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
