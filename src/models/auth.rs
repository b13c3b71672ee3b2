// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Dados denormalizados do usuário Monde, guardados na sessão para evitar
/// uma ida extra à API a cada requisição. Campos opcionais porque o Monde
/// nem sempre devolve todos os atributos no endpoint de tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DadosUsuario {
    pub login: String,
    pub email: Option<String>,
    pub nome: Option<String>,
    pub papel: Option<String>,
}

// Uma linha da tabela `sessoes`: o vínculo entre o token local e o token
// Bearer do Monde. Apagar a linha revoga o token local.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Sessao {
    pub id: Uuid,
    pub empresa_id: Uuid,
    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub monde_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub expira_em: DateTime<Utc>,
    pub dados_usuario: Json<DadosUsuario>,
    pub criado_em: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT local
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sessao_id: Uuid,
    pub empresa_id: Uuid,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// Dados para login contra o Monde
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "O e-mail ou login é obrigatório."))]
    #[schema(example = "joao")]
    pub email: String,

    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,

    #[serde(rename = "serverUrl")]
    #[validate(url(message = "A URL do servidor Monde é inválida."))]
    #[schema(example = "https://empresa.monde.com.br")]
    pub server_url: String,
}

// Resposta de autenticação
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: DadosUsuario,
    pub empresa_id: Uuid,
    pub has_active_plan: bool,
    pub monde_token: String,
}
