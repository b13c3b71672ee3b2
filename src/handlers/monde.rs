// src/handlers/monde.rs
//
// As rotas proxied: cada handler monta uma chamada ao Monde com o token da
// sessão, achata os relacionamentos da resposta e devolve. Falha do Monde
// sobe como AppError::Upstream e sai com o status original.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::SessaoAutenticada,
    models::monde::StatsTarefas,
    services::{
        monde_achatar::achatar_relacionamentos, monde_client::RespostaMonde,
        monde_filtros::traduzir_filtros,
    },
};

// Relacionamentos pedidos junto com as tarefas, para o achatamento ter o
// que copiar.
const INCLUDE_TAREFAS: &str = "person,assignee,category,author";

/// Copia os parâmetros de paginação do cliente, quando vierem.
fn repassar_paginacao(params: &HashMap<String, String>, query: &mut Vec<(String, String)>) {
    for chave in ["page[size]", "page[number]"] {
        if let Some(valor) = params.get(chave) {
            query.push((chave.to_string(), valor.clone()));
        }
    }
}

/// Corpos sem o envelope JSON:API são embrulhados como um recurso `tasks`.
/// O front-end antigo mandava ora o envelope completo, ora só os atributos.
/// Na atualização, o id do path entra no envelope quando faltar: o PATCH
/// JSON:API exige `data.id`.
fn envelopar_tarefa(mut corpo: Value, id: Option<Uuid>) -> Value {
    if let Some(data) = corpo.get_mut("data").and_then(Value::as_object_mut) {
        if let Some(id) = id {
            data.entry("id")
                .or_insert_with(|| json!(id.to_string()));
        }
        return corpo;
    }
    if corpo.get("data").is_some() {
        // envelope presente mas `data` não é objeto; vai como está
        return corpo;
    }
    let mut data = json!({ "type": "tasks", "attributes": corpo });
    if let Some(id) = id {
        data["id"] = json!(id.to_string());
    }
    json!({ "data": data })
}

// GET /api/monde/tarefas
#[utoipa::path(
    get,
    path = "/api/monde/tarefas",
    tag = "Monde",
    responses(
        (status = 200, description = "Tarefas com relacionamentos achatados"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_tarefas(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, AppError> {
    let mut query = traduzir_filtros(&params);
    query.push(("include".to_string(), INCLUDE_TAREFAS.to_string()));
    repassar_paginacao(&params, &mut query);

    let resposta = app_state
        .monde_client
        .listar_tarefas(&sessao.monde_token, &query)
        .await?;

    Ok(Json(achatar_relacionamentos(resposta.corpo)))
}

// POST /api/monde/tarefas
#[utoipa::path(
    post,
    path = "/api/monde/tarefas",
    tag = "Monde",
    responses(
        (status = 200, description = "Tarefa criada no Monde"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_tarefa(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
    Json(corpo): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let corpo = envelopar_tarefa(corpo, None);
    let resposta = app_state
        .monde_client
        .criar_tarefa(&sessao.monde_token, &corpo)
        .await?;

    Ok(Json(achatar_relacionamentos(resposta.corpo)))
}

// PUT /api/monde/tarefas/{id}
#[utoipa::path(
    put,
    path = "/api/monde/tarefas/{id}",
    tag = "Monde",
    params(("id" = Uuid, Path, description = "ID da tarefa no Monde")),
    responses(
        (status = 200, description = "Tarefa atualizada"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_tarefa(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
    Path(id): Path<Uuid>,
    Json(corpo): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let corpo = envelopar_tarefa(corpo, Some(id));
    let resposta = app_state
        .monde_client
        .atualizar_tarefa(&sessao.monde_token, &id.to_string(), &corpo)
        .await?;

    Ok(Json(achatar_relacionamentos(resposta.corpo)))
}

// DELETE /api/monde/tarefas/{id}
#[utoipa::path(
    delete,
    path = "/api/monde/tarefas/{id}",
    tag = "Monde",
    params(("id" = Uuid, Path, description = "ID da tarefa no Monde")),
    responses(
        (status = 204, description = "Tarefa excluída"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir_tarefa(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resposta = app_state
        .monde_client
        .excluir_tarefa(&sessao.monde_token, &id.to_string())
        .await?;

    Ok(match resposta_exclusao(resposta) {
        (status, None) => status.into_response(),
        (status, Some(corpo)) => (status, Json(corpo)).into_response(),
    })
}

/// Regra de repasse do DELETE: 204 do Monde vira 204 local com corpo
/// vazio; qualquer outro 2xx com corpo é repassado como veio.
fn resposta_exclusao(resposta: RespostaMonde) -> (StatusCode, Option<Value>) {
    if resposta.status == StatusCode::NO_CONTENT {
        return (StatusCode::NO_CONTENT, None);
    }
    (resposta.status, Some(resposta.corpo))
}

// GET /api/monde/tarefas/stats
#[utoipa::path(
    get,
    path = "/api/monde/tarefas/stats",
    tag = "Monde",
    responses(
        (status = 200, description = "Agregados das tarefas do usuário", body = StatsTarefas),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn stats_tarefas(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
) -> Result<Json<StatsTarefas>, AppError> {
    let query = vec![
        ("filter[assigned]".to_string(), "user_tasks".to_string()),
        ("page[size]".to_string(), "100".to_string()),
    ];
    let resposta = app_state
        .monde_client
        .listar_tarefas(&sessao.monde_token, &query)
        .await?;

    Ok(Json(calcular_stats(&resposta.corpo, Utc::now())))
}

// GET /api/monde/tarefas/{id}/historico
#[utoipa::path(
    get,
    path = "/api/monde/tarefas/{id}/historico",
    tag = "Monde",
    params(("id" = Uuid, Path, description = "ID da tarefa no Monde")),
    responses(
        (status = 200, description = "Histórico da tarefa, achatado"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn historico_tarefa(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let resposta = app_state
        .monde_client
        .historico_tarefas(&sessao.monde_token, id)
        .await?;

    // Filtro local por garantia: fica só o que aponta para a tarefa pedida,
    // mesmo que o Monde ignore o filter[task_id].
    let corpo = filtrar_historico_por_tarefa(resposta.corpo, id);

    Ok(Json(achatar_relacionamentos(corpo)))
}

// GET /api/monde/pessoas (e o alias /api/monde/clientes)
#[utoipa::path(
    get,
    path = "/api/monde/pessoas",
    tag = "Monde",
    responses(
        (status = 200, description = "Pessoas/clientes do Monde"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_pessoas(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, AppError> {
    let mut query: Vec<(String, String)> = Vec::new();
    if let Some(busca) = params.get("search").or_else(|| params.get("filter[search]")) {
        query.push(("filter[search]".to_string(), busca.clone()));
    }
    repassar_paginacao(&params, &mut query);

    let resposta = app_state
        .monde_client
        .listar_pessoas(&sessao.monde_token, &query)
        .await?;

    Ok(Json(achatar_relacionamentos(resposta.corpo)))
}

// GET /api/monde/categorias
#[utoipa::path(
    get,
    path = "/api/monde/categorias",
    tag = "Monde",
    responses(
        (status = 200, description = "Categorias de tarefa"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_categorias(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
) -> Result<Json<Value>, AppError> {
    let resposta = app_state
        .monde_client
        .listar_categorias(&sessao.monde_token)
        .await?;

    Ok(Json(resposta.corpo))
}

// GET /api/monde/usuarios
#[utoipa::path(
    get,
    path = "/api/monde/usuarios",
    tag = "Monde",
    responses(
        (status = 200, description = "Usuários do Monde (seletor de responsável)"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_usuarios(
    State(app_state): State<AppState>,
    SessaoAutenticada(sessao): SessaoAutenticada,
) -> Result<Json<Value>, AppError> {
    let resposta = app_state
        .monde_client
        .listar_usuarios(&sessao.monde_token)
        .await?;

    Ok(Json(resposta.corpo))
}

/// Mantém no documento só as entradas de histórico cujo relacionamento
/// `task` aponta para a tarefa pedida.
fn filtrar_historico_por_tarefa(mut doc: Value, tarefa_id: Uuid) -> Value {
    let id = tarefa_id.to_string();
    if let Some(entradas) = doc.get_mut("data").and_then(Value::as_array_mut) {
        entradas.retain(|entrada| {
            entrada["relationships"]["task"]["data"]["id"]
                .as_str()
                .map(|apontado| apontado == id)
                .unwrap_or(true) // sem ponteiro de tarefa, não descartamos
        });
    }
    doc
}

/// Uma data do Monde: RFC 3339 completo ou só `YYYY-MM-DD`. Datas sem hora
/// contam até o fim do dia, para a tarefa não virar "atrasada" na manhã do
/// próprio vencimento.
fn interpretar_vencimento(texto: &str) -> Option<DateTime<Utc>> {
    if let Ok(data_hora) = DateTime::parse_from_rfc3339(texto) {
        return Some(data_hora.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(texto, "%Y-%m-%d")
        .ok()
        .and_then(|data| data.and_hms_opt(23, 59, 59))
        .map(|data_hora| data_hora.and_utc())
}

/// Agrega as tarefas de um documento JSON:API em contadores.
/// `pendentes` é o resto: total - concluídas - atrasadas.
fn calcular_stats(doc: &Value, agora: DateTime<Utc>) -> StatsTarefas {
    let Some(tarefas) = doc.get("data").and_then(Value::as_array) else {
        return StatsTarefas::default();
    };

    let mut stats = StatsTarefas {
        total: tarefas.len() as u64,
        ..StatsTarefas::default()
    };

    for tarefa in tarefas {
        let atributos = &tarefa["attributes"];
        if atributos["completed"].as_bool().unwrap_or(false) {
            stats.concluidas += 1;
            continue;
        }

        let Some(vencimento) = atributos["due"].as_str().and_then(interpretar_vencimento) else {
            continue;
        };
        if vencimento < agora {
            stats.atrasadas += 1;
        }
        if vencimento.date_naive() == agora.date_naive() {
            stats.vencem_hoje += 1;
        }
    }

    stats.pendentes = stats.total - stats.concluidas - stats.atrasadas;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tarefa(completed: bool, due: Option<&str>) -> Value {
        let mut atributos = json!({ "completed": completed });
        if let Some(due) = due {
            atributos["due"] = json!(due);
        }
        json!({ "type": "tasks", "id": Uuid::new_v4().to_string(), "attributes": atributos })
    }

    #[test]
    fn stats_do_cenario_de_referencia() {
        // 10 tarefas: 3 concluídas, 2 abertas e vencidas, 5 restantes
        let mut tarefas = Vec::new();
        for _ in 0..3 {
            tarefas.push(tarefa(true, None));
        }
        for _ in 0..2 {
            tarefas.push(tarefa(false, Some("2020-01-01T12:00:00Z")));
        }
        for _ in 0..5 {
            tarefas.push(tarefa(false, Some("2099-01-01T12:00:00Z")));
        }
        let doc = json!({ "data": tarefas });

        let stats = calcular_stats(&doc, Utc::now());
        assert_eq!(
            stats,
            StatsTarefas {
                total: 10,
                pendentes: 5,
                concluidas: 3,
                atrasadas: 2,
                vencem_hoje: 0,
            }
        );
    }

    #[test]
    fn tarefa_concluida_nao_conta_como_atrasada() {
        let doc = json!({ "data": [tarefa(true, Some("2020-01-01T12:00:00Z"))] });
        let stats = calcular_stats(&doc, Utc::now());
        assert_eq!(stats.concluidas, 1);
        assert_eq!(stats.atrasadas, 0);
    }

    #[test]
    fn data_sem_hora_vale_ate_o_fim_do_dia() {
        let hoje = Utc::now().date_naive().to_string();
        let doc = json!({ "data": [tarefa(false, Some(hoje.as_str()))] });
        let stats = calcular_stats(&doc, Utc::now());
        assert_eq!(stats.atrasadas, 0);
        assert_eq!(stats.vencem_hoje, 1);
        assert_eq!(stats.pendentes, 1);
    }

    #[test]
    fn tarefa_sem_vencimento_e_so_pendente() {
        let doc = json!({ "data": [tarefa(false, None)] });
        let stats = calcular_stats(&doc, Utc::now());
        assert_eq!(
            stats,
            StatsTarefas {
                total: 1,
                pendentes: 1,
                ..StatsTarefas::default()
            }
        );
    }

    #[test]
    fn documento_sem_data_zera_tudo() {
        let stats = calcular_stats(&json!({}), Utc::now());
        assert_eq!(stats, StatsTarefas::default());
    }

    #[test]
    fn historico_descarta_entradas_de_outras_tarefas() {
        let alvo = Uuid::new_v4();
        let outra = Uuid::new_v4();
        let entrada = |id: Uuid| {
            json!({
                "type": "task-historics",
                "id": Uuid::new_v4().to_string(),
                "relationships": { "task": { "data": { "type": "tasks", "id": id.to_string() } } }
            })
        };
        let doc = json!({ "data": [entrada(alvo), entrada(outra), entrada(alvo)] });

        let filtrado = filtrar_historico_por_tarefa(doc, alvo);
        assert_eq!(filtrado["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn corpo_sem_envelope_e_embrulhado_como_tarefa() {
        let corpo = json!({ "title": "Nova tarefa", "completed": false });
        let envelopado = envelopar_tarefa(corpo, None);
        assert_eq!(envelopado["data"]["type"], "tasks");
        assert_eq!(envelopado["data"]["attributes"]["title"], "Nova tarefa");
    }

    #[test]
    fn corpo_ja_envelopado_passa_como_esta() {
        let corpo = json!({ "data": { "type": "tasks", "attributes": { "title": "X" } } });
        assert_eq!(envelopar_tarefa(corpo.clone(), None), corpo);
    }

    #[test]
    fn atualizacao_ganha_o_id_no_envelope() {
        let id = Uuid::new_v4();
        let envelopado = envelopar_tarefa(json!({ "completed": true }), Some(id));
        assert_eq!(envelopado["data"]["id"], id.to_string());
    }

    #[test]
    fn envelope_sem_id_ganha_o_id_do_path() {
        let id = Uuid::new_v4();
        let corpo = json!({ "data": { "type": "tasks", "attributes": { "completed": true } } });
        let envelopado = envelopar_tarefa(corpo, Some(id));
        assert_eq!(envelopado["data"]["id"], id.to_string());
    }

    #[test]
    fn envelope_com_id_proprio_nao_e_sobrescrito() {
        let corpo = json!({ "data": { "type": "tasks", "id": "original",
                                      "attributes": { "completed": true } } });
        let envelopado = envelopar_tarefa(corpo, Some(Uuid::new_v4()));
        assert_eq!(envelopado["data"]["id"], "original");
    }

    #[test]
    fn exclusao_com_204_vira_204_sem_corpo() {
        let resposta = RespostaMonde {
            status: StatusCode::NO_CONTENT,
            corpo: Value::Null,
        };
        assert_eq!(resposta_exclusao(resposta), (StatusCode::NO_CONTENT, None));
    }

    #[test]
    fn exclusao_sem_204_repassa_status_e_corpo_do_monde() {
        let corpo = json!({ "errors": [{ "detail": "tarefa vinculada" }] });
        let resposta = RespostaMonde {
            status: StatusCode::OK,
            corpo: corpo.clone(),
        };
        assert_eq!(resposta_exclusao(resposta), (StatusCode::OK, Some(corpo)));
    }
}
