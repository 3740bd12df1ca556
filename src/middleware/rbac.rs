// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, middleware::auth::CurrentUser, models::profile::Role};

/// 1. O Trait que define a allow-list de papéis de uma rota
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [Role];
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o usuário já resolvido pelo auth_guard
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or(AppError::Unauthorized)?;

        // B. Checa a allow-list da rota
        if !T::allowed().contains(&user.role) {
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS CONJUNTOS DE PAPÉIS
// ---

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allowed() -> &'static [Role] {
        &[Role::Admin, Role::Superadmin]
    }
}
