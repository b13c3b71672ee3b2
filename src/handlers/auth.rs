// src/handlers/auth.rs

use axum::{extract::State, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::SessaoAutenticada,
    models::auth::{LoginPayload, LoginResponse},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login aceito pelo Monde", body = LoginResponse),
        (status = 400, description = "Payload inválido"),
        (status = 401, description = "Credenciais recusadas pelo Monde")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let resposta = app_state.auth_service.login(&payload).await?;

    Ok(Json(resposta))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão encerrada"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
) -> Result<Json<Value>, AppError> {
    app_state.auth_service.logout(&sessao).await?;

    Ok(Json(json!({ "message": "Logout realizado com sucesso." })))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Dados do usuário da sessão"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(SessaoAutenticada(sessao): SessaoAutenticada) -> Json<Value> {
    Json(json!({
        "user": sessao.dados_usuario.0,
        "empresa_id": sessao.empresa_id,
        "expira_em": sessao.expira_em,
    }))
}
