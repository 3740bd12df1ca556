// src/handlers/setup.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::profile::{SetupPayload, UserProfile},
};

// POST /api/setup
// Rota pública de propósito: roda antes de existir qualquer conta.
#[utoipa::path(
    post,
    path = "/api/setup",
    tag = "Setup",
    request_body = SetupPayload,
    responses(
        (status = 200, description = "Primeiro superadmin criado", body = UserProfile),
        (status = 400, description = "Setup já concluído ou dados inválidos")
    )
)]
pub async fn setup(
    State(app_state): State<AppState>,
    Json(payload): Json<SetupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let profile = app_state.account_service.setup(payload).await?;
    Ok((StatusCode::OK, Json(profile)))
}
