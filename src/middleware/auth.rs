// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::profile::{Role, UserProfile},
};

// Identidade resolvida do chamador: token verificado pelo provedor de
// identidade + papel vindo do perfil da aplicação.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
    pub role: Role,
    pub profile: Option<UserProfile>,
}

async fn resolve_current_user(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let identity = state.identity.verify_token(token).await?;

    // Perfil ausente ainda autentica, mas com o privilégio mínimo.
    let profile = state.profile_repo.find(&identity.id).await?;
    let role = profile.as_ref().map(|p| p.role).unwrap_or(Role::User);

    Ok(CurrentUser {
        id: identity.id,
        email: identity.email,
        role,
        profile,
    })
}

// O middleware em si: exige um token válido e injeta o CurrentUser na
// requisição antes de qualquer handler rodar.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(authorization) = bearer.ok_or(AppError::Unauthorized)?;
    let user = resolve_current_user(&app_state, authorization.token()).await?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
