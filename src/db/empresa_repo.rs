// src/db/empresa_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::empresa::Empresa;

// ON CONFLICT DO NOTHING: dois primeiros logins simultâneos da mesma URL
// não podem derrubar o perdedor com violação de unicidade; quem perder a
// corrida reconsulta e converge na linha do vencedor.
const SQL_INSERIR_EMPRESA: &str =
    "INSERT INTO empresas (nome, monde_url, monde_empresa_id)
     VALUES ($1, $2, $3)
     ON CONFLICT (monde_url) DO NOTHING
     RETURNING id, nome, monde_url, monde_empresa_id, ativo, criado_em";

#[derive(Clone)]
pub struct EmpresaRepository {
    pool: PgPool,
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Empresa>, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>(
            "SELECT id, nome, monde_url, monde_empresa_id, ativo, criado_em
             FROM empresas
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(empresa)
    }

    pub async fn find_by_monde_url(&self, monde_url: &str) -> Result<Option<Empresa>, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>(
            "SELECT id, nome, monde_url, monde_empresa_id, ativo, criado_em
             FROM empresas
             WHERE monde_url = $1",
        )
        .bind(monde_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(empresa)
    }

    /// Busca a empresa pela URL Monde, criando-a no primeiro login vindo de
    /// uma URL nova. Logins concorrentes da mesma URL convergem na mesma
    /// linha: o INSERT não retorna nada para quem perde a corrida, e a
    /// reconsulta encontra a linha do vencedor.
    pub async fn find_or_create(
        &self,
        nome: &str,
        monde_url: &str,
        monde_empresa_id: &str,
    ) -> Result<Empresa, AppError> {
        if let Some(empresa) = self.find_by_monde_url(monde_url).await? {
            return Ok(empresa);
        }

        let inserida = sqlx::query_as::<_, Empresa>(SQL_INSERIR_EMPRESA)
            .bind(nome)
            .bind(monde_url)
            .bind(monde_empresa_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(empresa) = inserida {
            tracing::info!(
                "🏢 Empresa nova registrada: {} ({})",
                empresa.nome,
                empresa.monde_url
            );
            return Ok(empresa);
        }

        // outra requisição inseriu entre a consulta e o INSERT
        self.find_by_monde_url(monde_url).await?.ok_or_else(|| {
            anyhow::anyhow!("Empresa sumiu logo após o conflito de inserção: {}", monde_url)
                .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_de_empresa_tolera_corrida_pelo_monde_url() {
        // o perdedor do primeiro login simultâneo não pode estourar com
        // violação de unicidade
        assert!(SQL_INSERIR_EMPRESA.contains("ON CONFLICT (monde_url) DO NOTHING"));
    }
}
