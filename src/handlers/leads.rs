// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{AdminOnly, RequireRole},
    },
    models::lead::{CreateLeadPayload, Lead, UpdateLeadPayload},
};

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Todos os leads, mais recentes primeiro", body = Vec<Lead>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_repo.list().await?;
    Ok((StatusCode::OK, Json(leads)))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 200, description = "Lead criado", body = Lead),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_repo.create(payload, &user.id).await?;
    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead após o merge", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = String, Path, description = "ID do lead")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_repo.update(&id, payload).await?;
    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    responses(
        (status = 200, description = "Remoção confirmada (idempotente)"),
        (status = 403, description = "Papel insuficiente")
    ),
    params(
        ("id" = String, Path, description = "ID do lead")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_repo.delete(&id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
