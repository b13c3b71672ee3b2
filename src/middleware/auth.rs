// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::Sessao};

// O middleware em si: valida o Bearer e pendura a sessão nos extensions.
// Distinção fina exigida pelo contrato: header ausente é TokenAusente,
// header torto é TokenInvalido.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::TokenAusente)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalido)?;

    let sessao = app_state.auth_service.authenticate(token).await?;

    request.extensions_mut().insert(sessao);
    Ok(next.run(request).await)
}

// Extrator para obter a sessão autenticada diretamente nos handlers
pub struct SessaoAutenticada(pub Sessao);

impl<S> FromRequestParts<S> for SessaoAutenticada
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Sessao>()
            .cloned()
            .map(SessaoAutenticada)
            .ok_or(AppError::TokenAusente)
    }
}
