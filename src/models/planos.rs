// src/models/planos.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

// Um plano comercial do Keeptur. A tabela é semeada na inicialização e
// tratada como somente-leitura depois disso.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Plano {
    pub id: Uuid,
    pub nome: String,
    /// preço mensal em centavos
    pub preco_mensal: i32,
    pub max_usuarios: i32,
    #[schema(value_type = Object)]
    pub recursos: Json<Value>,
    pub ativo: bool,
}

// Uma janela de assinatura de um plano por uma empresa. Uma empresa pode
// acumular várias linhas ao longo do tempo; a "vigente" é a linha ativa
// com o maior `data_fim` ainda no futuro.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Assinatura {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub plano_id: Uuid,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub ativo: bool,
}

// Registro append-only de um evento de pagamento de assinatura.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Pagamento {
    pub id: Uuid,
    pub assinatura_id: Uuid,
    pub valor: i32,
    pub data_pagamento: DateTime<Utc>,
    pub status: String,
    pub transacao_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssinarPayload {
    #[serde(rename = "planId")]
    pub plan_id: Uuid,
    #[serde(rename = "empresaId")]
    pub empresa_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssinarResposta {
    pub success: bool,
    pub assinatura: Assinatura,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusPlanoResposta {
    pub has_active_plan: bool,
    pub plan: Option<Plano>,
    pub expires_at: Option<DateTime<Utc>>,
}
