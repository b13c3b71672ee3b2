// src/models/empresa.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Um tenant do Keeptur, identificado pela URL do servidor Monde.
// `monde_url` e `monde_empresa_id` são imutáveis depois de criados.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Empresa {
    pub id: Uuid,
    pub nome: String,
    pub monde_url: String,
    pub monde_empresa_id: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}
