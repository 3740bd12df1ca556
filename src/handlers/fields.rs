// src/handlers/fields.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::fields::{FieldDefinition, validate_schema},
};

// GET /api/fields
// Qualquer usuário autenticado pode ler: é o que monta o formulário.
#[utoipa::path(
    get,
    path = "/api/fields",
    tag = "Fields",
    responses(
        (status = 200, description = "Schema ativo (vazio se nunca configurado)", body = Vec<FieldDefinition>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_fields(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let fields = app_state.field_repo.get().await?;
    Ok((StatusCode::OK, Json(fields)))
}

// POST /api/fields
#[utoipa::path(
    post,
    path = "/api/fields",
    tag = "Fields",
    request_body = Vec<FieldDefinition>,
    responses(
        (status = 200, description = "Schema gravado, ecoado de volta", body = Vec<FieldDefinition>),
        (status = 400, description = "Nome vazio ou duplicado"),
        (status = 403, description = "Papel insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn replace_fields(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Json(fields): Json<Vec<FieldDefinition>>,
) -> Result<impl IntoResponse, AppError> {
    validate_schema(&fields)?;

    app_state.field_repo.replace(&fields).await?;
    Ok((StatusCode::OK, Json(fields)))
}
