// src/db/plano_repo.rs

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::planos::{Assinatura, Pagamento, Plano};

#[derive(Clone)]
pub struct PlanoRepository {
    pool: PgPool,
}

impl PlanoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar_ativos(&self) -> Result<Vec<Plano>, AppError> {
        let planos = sqlx::query_as::<_, Plano>(
            "SELECT id, nome, preco_mensal, max_usuarios, recursos, ativo
             FROM planos
             WHERE ativo = TRUE
             ORDER BY preco_mensal ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(planos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Plano>, AppError> {
        let plano = sqlx::query_as::<_, Plano>(
            "SELECT id, nome, preco_mensal, max_usuarios, recursos, ativo
             FROM planos
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plano)
    }

    pub async fn contar(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM planos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Usado apenas pelo seed inicial; a tabela é somente-leitura depois.
    pub async fn inserir(
        &self,
        nome: &str,
        preco_mensal: i32,
        max_usuarios: i32,
        recursos: &Value,
    ) -> Result<Plano, AppError> {
        let plano = sqlx::query_as::<_, Plano>(
            "INSERT INTO planos (nome, preco_mensal, max_usuarios, recursos)
             VALUES ($1, $2, $3, $4)
             RETURNING id, nome, preco_mensal, max_usuarios, recursos, ativo",
        )
        .bind(nome)
        .bind(preco_mensal)
        .bind(max_usuarios)
        .bind(Json(recursos))
        .fetch_one(&self.pool)
        .await?;

        Ok(plano)
    }

    /// Todas as assinaturas ativas de uma empresa; quem decide qual é a
    /// vigente é o serviço de planos.
    pub async fn listar_assinaturas_ativas(
        &self,
        empresa_id: Uuid,
    ) -> Result<Vec<Assinatura>, AppError> {
        let assinaturas = sqlx::query_as::<_, Assinatura>(
            "SELECT id, empresa_id, plano_id, data_inicio, data_fim, ativo
             FROM assinaturas
             WHERE empresa_id = $1 AND ativo = TRUE
             ORDER BY data_fim DESC",
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assinaturas)
    }

    pub async fn criar_assinatura(
        &self,
        empresa_id: Uuid,
        plano_id: Uuid,
        data_inicio: DateTime<Utc>,
        data_fim: DateTime<Utc>,
    ) -> Result<Assinatura, AppError> {
        let assinatura = sqlx::query_as::<_, Assinatura>(
            "INSERT INTO assinaturas (empresa_id, plano_id, data_inicio, data_fim)
             VALUES ($1, $2, $3, $4)
             RETURNING id, empresa_id, plano_id, data_inicio, data_fim, ativo",
        )
        .bind(empresa_id)
        .bind(plano_id)
        .bind(data_inicio)
        .bind(data_fim)
        .fetch_one(&self.pool)
        .await?;

        Ok(assinatura)
    }

    pub async fn registrar_pagamento(
        &self,
        assinatura_id: Uuid,
        valor: i32,
        status: &str,
        transacao_id: &str,
    ) -> Result<Pagamento, AppError> {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            "INSERT INTO pagamentos (assinatura_id, valor, data_pagamento, status, transacao_id)
             VALUES ($1, $2, NOW(), $3, $4)
             RETURNING id, assinatura_id, valor, data_pagamento, status, transacao_id",
        )
        .bind(assinatura_id)
        .bind(valor)
        .bind(status)
        .bind(transacao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(pagamento)
    }
}
