// src/services/monde_client.rs
//
// Cliente HTTP para a API v2 do Monde. Um reqwest::Client com timeout fixo
// de 10s; nenhuma chamada é repetida — falha do Monde é falha terminal da
// requisição local, com o status repassado verbatim.

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::error::AppError;

const CONTENT_TYPE_JSONAPI: &str = "application/vnd.api+json";

/// Resposta crua de uma chamada 2xx ao Monde.
pub struct RespostaMonde {
    pub status: StatusCode,
    pub corpo: Value,
}

#[derive(Clone)]
pub struct MondeClient {
    http: Client,
    base_url: String,
}

impl MondeClient {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Troca login e senha por um token Bearer no endpoint de tokens do
    /// Monde. Qualquer resposta não-2xx (ou falha de rede) vira
    /// `CredenciaisInvalidas`, carregando o status do Monde como
    /// diagnóstico (0 quando nem houve resposta).
    pub async fn obter_token(&self, login: &str, senha: &str) -> Result<Value, AppError> {
        let corpo = json!({
            "data": {
                "type": "tokens",
                "attributes": { "login": login, "password": senha }
            }
        });

        let resposta = self
            .http
            .post(format!("{}/tokens", self.base_url))
            .header("Accept", CONTENT_TYPE_JSONAPI)
            .header("Content-Type", CONTENT_TYPE_JSONAPI)
            .json(&corpo)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Login no Monde falhou antes da resposta: {}", e);
                AppError::CredenciaisInvalidas(0)
            })?;

        let status = resposta.status();
        if !status.is_success() {
            return Err(AppError::CredenciaisInvalidas(status.as_u16()));
        }

        resposta
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Resposta de token do Monde não é JSON: {}", e).into())
    }

    /// Uma chamada autenticada a um recurso do Monde.
    ///
    /// 2xx devolve o corpo (Null no caso de 204); não-2xx vira
    /// `AppError::Upstream` com o status e o corpo originais, para o
    /// handler repassar sem retocar.
    async fn chamar(
        &self,
        metodo: Method,
        caminho: &str,
        token: &str,
        query: &[(String, String)],
        corpo: Option<&Value>,
    ) -> Result<RespostaMonde, AppError> {
        let mut requisicao = self
            .http
            .request(metodo, format!("{}/{}", self.base_url, caminho))
            .header("Accept", CONTENT_TYPE_JSONAPI)
            .header("Content-Type", CONTENT_TYPE_JSONAPI)
            .header("Authorization", format!("Bearer {token}"));
        if !query.is_empty() {
            requisicao = requisicao.query(query);
        }
        if let Some(corpo) = corpo {
            requisicao = requisicao.json(corpo);
        }

        let resposta = requisicao.send().await?;
        let status = resposta.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(RespostaMonde { status, corpo: Value::Null });
        }

        let corpo = resposta.json::<Value>().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(AppError::Upstream { status, corpo });
        }

        Ok(RespostaMonde { status, corpo })
    }

    pub async fn listar_tarefas(
        &self,
        token: &str,
        query: &[(String, String)],
    ) -> Result<RespostaMonde, AppError> {
        self.chamar(Method::GET, "tasks", token, query, None).await
    }

    pub async fn criar_tarefa(&self, token: &str, corpo: &Value) -> Result<RespostaMonde, AppError> {
        self.chamar(Method::POST, "tasks", token, &[], Some(corpo))
            .await
    }

    // A API do Monde segue JSON:API: atualização parcial é PATCH.
    pub async fn atualizar_tarefa(
        &self,
        token: &str,
        id: &str,
        corpo: &Value,
    ) -> Result<RespostaMonde, AppError> {
        self.chamar(Method::PATCH, &format!("tasks/{id}"), token, &[], Some(corpo))
            .await
    }

    pub async fn excluir_tarefa(&self, token: &str, id: &str) -> Result<RespostaMonde, AppError> {
        self.chamar(Method::DELETE, &format!("tasks/{id}"), token, &[], None)
            .await
    }

    pub async fn historico_tarefas(
        &self,
        token: &str,
        tarefa_id: Uuid,
    ) -> Result<RespostaMonde, AppError> {
        let query = vec![
            ("filter[task_id]".to_string(), tarefa_id.to_string()),
            ("include".to_string(), "author,person".to_string()),
        ];
        self.chamar(Method::GET, "task_historics", token, &query, None)
            .await
    }

    pub async fn listar_pessoas(
        &self,
        token: &str,
        query: &[(String, String)],
    ) -> Result<RespostaMonde, AppError> {
        self.chamar(Method::GET, "people", token, query, None).await
    }

    pub async fn listar_categorias(&self, token: &str) -> Result<RespostaMonde, AppError> {
        self.chamar(Method::GET, "task_categories", token, &[], None)
            .await
    }

    pub async fn listar_usuarios(&self, token: &str) -> Result<RespostaMonde, AppError> {
        self.chamar(Method::GET, "users", token, &[], None).await
    }
}
