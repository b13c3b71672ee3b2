// src/services/plano_service.rs
//
// Planos, assinaturas e o gate de entitlement: um tenant autenticado só
// chega ao dashboard se tiver assinatura ativa com data_fim no futuro.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmpresaRepository, PlanoRepository},
    models::planos::{Assinatura, AssinarResposta, Plano, StatusPlanoResposta},
};

const DIAS_ASSINATURA: i64 = 30;

/// A assinatura vigente entre as linhas de uma empresa: a ativa com o maior
/// `data_fim` ainda no futuro. Nenhuma linha assim = sem plano.
fn assinatura_vigente(assinaturas: &[Assinatura], agora: DateTime<Utc>) -> Option<&Assinatura> {
    assinaturas
        .iter()
        .filter(|a| a.ativo && a.data_fim > agora)
        .max_by_key(|a| a.data_fim)
}

#[derive(Clone)]
pub struct PlanoService {
    plano_repo: PlanoRepository,
    empresa_repo: EmpresaRepository,
}

impl PlanoService {
    pub fn new(plano_repo: PlanoRepository, empresa_repo: EmpresaRepository) -> Self {
        Self {
            plano_repo,
            empresa_repo,
        }
    }

    pub async fn listar_planos(&self) -> Result<Vec<Plano>, AppError> {
        self.plano_repo.listar_ativos().await
    }

    /// O gate entre "autenticado" e "pode usar o produto". Sem cache:
    /// recalculado a cada chamada.
    pub async fn empresa_tem_plano_ativo(&self, empresa_id: Uuid) -> Result<bool, AppError> {
        let assinaturas = self.plano_repo.listar_assinaturas_ativas(empresa_id).await?;
        Ok(assinatura_vigente(&assinaturas, Utc::now()).is_some())
    }

    pub async fn status(&self, empresa_id: Uuid) -> Result<StatusPlanoResposta, AppError> {
        self.empresa_repo
            .find_by_id(empresa_id)
            .await?
            .ok_or(AppError::EmpresaNaoEncontrada)?;

        let assinaturas = self.plano_repo.listar_assinaturas_ativas(empresa_id).await?;
        let Some(vigente) = assinatura_vigente(&assinaturas, Utc::now()) else {
            return Ok(StatusPlanoResposta {
                has_active_plan: false,
                plan: None,
                expires_at: None,
            });
        };

        let plano = self.plano_repo.find_by_id(vigente.plano_id).await?;
        Ok(StatusPlanoResposta {
            has_active_plan: true,
            plan: plano,
            expires_at: Some(vigente.data_fim),
        })
    }

    /// Assina um plano por 30 dias e registra o pagamento correspondente no
    /// log append-only. Fluxo demo: o pagamento nasce aprovado.
    pub async fn assinar(
        &self,
        plano_id: Uuid,
        empresa_id: Uuid,
    ) -> Result<AssinarResposta, AppError> {
        let plano = self
            .plano_repo
            .find_by_id(plano_id)
            .await?
            .ok_or(AppError::PlanoNaoEncontrado)?;
        self.empresa_repo
            .find_by_id(empresa_id)
            .await?
            .ok_or(AppError::EmpresaNaoEncontrada)?;

        let agora = Utc::now();
        let data_fim = agora + chrono::Duration::days(DIAS_ASSINATURA);
        let assinatura = self
            .plano_repo
            .criar_assinatura(empresa_id, plano_id, agora, data_fim)
            .await?;

        let transacao_id = format!("TXN-{}", Uuid::new_v4());
        self.plano_repo
            .registrar_pagamento(assinatura.id, plano.preco_mensal, "aprovado", &transacao_id)
            .await?;

        tracing::info!(
            "💳 Empresa {} assinou o plano {} até {}",
            empresa_id,
            plano.nome,
            data_fim
        );

        Ok(AssinarResposta {
            success: true,
            assinatura,
            expires_at: data_fim,
        })
    }

    /// Semeia os três planos de tabela quando o banco está vazio. Roda uma
    /// vez na inicialização, depois das migrações.
    pub async fn seed_planos_iniciais(&self) -> Result<(), AppError> {
        if self.plano_repo.contar().await? > 0 {
            return Ok(());
        }

        self.plano_repo
            .inserir(
                "Básico",
                4990,
                5,
                &json!({ "tarefas": true, "clientes": true, "relatorios": false, "suporte_prioritario": false }),
            )
            .await?;
        self.plano_repo
            .inserir(
                "Profissional",
                9990,
                15,
                &json!({ "tarefas": true, "clientes": true, "relatorios": true, "suporte_prioritario": false }),
            )
            .await?;
        self.plano_repo
            .inserir(
                "Empresarial",
                19990,
                50,
                &json!({ "tarefas": true, "clientes": true, "relatorios": true, "suporte_prioritario": true }),
            )
            .await?;

        tracing::info!("🌱 Planos iniciais semeados.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assinatura(ativo: bool, dias_ate_fim: i64) -> Assinatura {
        let agora = Utc::now();
        Assinatura {
            id: Uuid::new_v4(),
            empresa_id: Uuid::new_v4(),
            plano_id: Uuid::new_v4(),
            data_inicio: agora - chrono::Duration::days(30),
            data_fim: agora + chrono::Duration::days(dias_ate_fim),
            ativo,
        }
    }

    #[test]
    fn sem_linhas_nao_ha_assinatura_vigente() {
        assert!(assinatura_vigente(&[], Utc::now()).is_none());
    }

    #[test]
    fn linha_ativa_com_fim_no_futuro_e_vigente() {
        let linhas = vec![assinatura(true, 10)];
        assert!(assinatura_vigente(&linhas, Utc::now()).is_some());
    }

    #[test]
    fn linha_vencida_nao_conta() {
        let linhas = vec![assinatura(true, -1)];
        assert!(assinatura_vigente(&linhas, Utc::now()).is_none());
    }

    #[test]
    fn linha_inativa_nao_conta_mesmo_com_fim_no_futuro() {
        let linhas = vec![assinatura(false, 10)];
        assert!(assinatura_vigente(&linhas, Utc::now()).is_none());
    }

    #[test]
    fn entre_varias_vale_a_de_maior_data_fim() {
        let curta = assinatura(true, 5);
        let longa = assinatura(true, 60);
        let vencida = assinatura(true, -5);
        let linhas = vec![curta.clone(), vencida, longa.clone()];

        let vigente = assinatura_vigente(&linhas, Utc::now()).unwrap();
        assert_eq!(vigente.id, longa.id);
    }
}
