// src/services/account.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::ProfileRepository,
    models::profile::{CreateUserPayload, Role, SetupPayload, UserProfile},
    services::identity::IdentityProvider,
};

// Orquestra o provedor de identidade (credenciais) e o repositório de
// perfis (papel). São dois limites de confiança distintos, unidos pelo
// subject id.
#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    profiles: ProfileRepository,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: ProfileRepository) -> Self {
        Self { identity, profiles }
    }

    pub async fn create_user(
        &self,
        caller_role: Role,
        payload: CreateUserPayload,
    ) -> Result<UserProfile, AppError> {
        // Conceder papel acima de "user" exige superadmin.
        if payload.role != Role::User && caller_role != Role::Superadmin {
            return Err(AppError::Forbidden);
        }

        let identity = self
            .identity
            .create_user(&payload.email, &payload.password, &payload.name)
            .await?;

        let profile = UserProfile {
            id: identity.id,
            email: payload.email,
            name: payload.name,
            role: payload.role,
            created_at: Utc::now(),
        };
        self.profiles.save(&profile).await?;

        tracing::info!("👤 Usuário criado: {} ({:?})", profile.email, profile.role);
        Ok(profile)
    }

    // Bootstrap único: só funciona enquanto nenhum perfil existir. O primeiro
    // usuário nasce superadmin.
    pub async fn setup(&self, payload: SetupPayload) -> Result<UserProfile, AppError> {
        if self.profiles.any_exists().await? {
            return Err(AppError::AlreadyInitialized);
        }

        let identity = self
            .identity
            .create_user(&payload.email, &payload.password, &payload.name)
            .await?;

        let profile = UserProfile {
            id: identity.id,
            email: payload.email,
            name: payload.name,
            role: Role::Superadmin,
            created_at: Utc::now(),
        };
        self.profiles.save(&profile).await?;

        tracing::info!("🚀 Setup concluído: superadmin {}", profile.email);
        Ok(profile)
    }
}
