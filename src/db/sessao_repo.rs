// src/db/sessao_repo.rs

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::{DadosUsuario, Sessao};

#[derive(Clone)]
pub struct SessaoRepository {
    pool: PgPool,
}

impl SessaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        empresa_id: Uuid,
        monde_token: &str,
        refresh_token: Option<&str>,
        expira_em: DateTime<Utc>,
        dados_usuario: &DadosUsuario,
    ) -> Result<Sessao, AppError> {
        let sessao = sqlx::query_as::<_, Sessao>(
            "INSERT INTO sessoes (empresa_id, monde_token, refresh_token, expira_em, dados_usuario)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, empresa_id, monde_token, refresh_token, expira_em, dados_usuario, criado_em",
        )
        .bind(empresa_id)
        .bind(monde_token)
        .bind(refresh_token)
        .bind(expira_em)
        .bind(Json(dados_usuario))
        .fetch_one(&self.pool)
        .await?;

        Ok(sessao)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Sessao>, AppError> {
        let sessao = sqlx::query_as::<_, Sessao>(
            "SELECT id, empresa_id, monde_token, refresh_token, expira_em, dados_usuario, criado_em
             FROM sessoes
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sessao)
    }

    /// Apaga a linha da sessão. Idempotente: apagar uma sessão que já não
    /// existe não é erro (logout repetido, limpeza preguiçosa concorrente).
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
