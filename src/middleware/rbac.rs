// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::User};

// Guarda de papel. O sistema tem três papéis fixos (admin / auditor /
// user), então a exigência vira um tipo: o handler declara
// `RequireRole<AdminOnly>` nos argumentos e a checagem acontece antes
// de qualquer lógica.

/// 1. O Trait que define o que um papel exige
pub trait RoleDef: Send + Sync + 'static {
    fn allows(user: &User) -> bool;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // O auth_guard já rodou e deixou o usuário nos extensions
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        if !T::allows(user) {
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allows(user: &User) -> bool {
        user.role.is_admin()
    }
}
