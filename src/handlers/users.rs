// src/handlers/users.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{AdminOnly, RequireRole},
    },
    models::profile::{CreateUserPayload, UserProfile},
};

// GET /api/me
// Perfil + papel do chamador. Quem ainda não tem perfil gravado volta com o
// mínimo que o token fornece e papel "user".
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do chamador", body = UserProfile),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(user: CurrentUser) -> Result<Json<Value>, AppError> {
    match user.profile {
        Some(profile) => Ok(Json(serde_json::to_value(profile)?)),
        None => Ok(Json(json!({
            "id": user.id,
            "email": user.email,
            "role": user.role,
        }))),
    }
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 200, description = "Perfil criado", body = UserProfile),
        (status = 400, description = "Dados inválidos ou recusa do provedor"),
        (status = 403, description = "Papel insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    user: CurrentUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let profile = app_state
        .account_service
        .create_user(user.role, payload)
        .await?;

    Ok((StatusCode::OK, Json(profile)))
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Todos os perfis, sem ordenação definida", body = Vec<UserProfile>),
        (status = 403, description = "Papel insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let profiles = app_state.profile_repo.list().await?;
    Ok((StatusCode::OK, Json(profiles)))
}
