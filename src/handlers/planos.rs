// src/handlers/planos.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::planos::{AssinarPayload, AssinarResposta, Plano, StatusPlanoResposta},
};

// GET /api/plans
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Planos",
    responses(
        (status = 200, description = "Planos comerciais ativos", body = [Plano])
    )
)]
pub async fn listar_planos(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Plano>>, AppError> {
    let planos = app_state.plano_service.listar_planos().await?;

    Ok(Json(planos))
}

// POST /api/plans/subscribe
#[utoipa::path(
    post,
    path = "/api/plans/subscribe",
    tag = "Planos",
    request_body = AssinarPayload,
    responses(
        (status = 200, description = "Assinatura criada", body = AssinarResposta),
        (status = 404, description = "Plano ou empresa não encontrados")
    )
)]
pub async fn assinar(
    State(app_state): State<AppState>,
    Json(payload): Json<AssinarPayload>,
) -> Result<Json<AssinarResposta>, AppError> {
    let resposta = app_state
        .plano_service
        .assinar(payload.plan_id, payload.empresa_id)
        .await?;

    Ok(Json(resposta))
}

// GET /api/plans/status/{empresaId}
#[utoipa::path(
    get,
    path = "/api/plans/status/{empresa_id}",
    tag = "Planos",
    params(
        ("empresa_id" = Uuid, Path, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Situação do plano da empresa", body = StatusPlanoResposta),
        (status = 404, description = "Empresa não encontrada")
    )
)]
pub async fn status_plano(
    State(app_state): State<AppState>,
    Path(empresa_id): Path<Uuid>,
) -> Result<Json<StatusPlanoResposta>, AppError> {
    let status = app_state.plano_service.status(empresa_id).await?;

    Ok(Json(status))
}
