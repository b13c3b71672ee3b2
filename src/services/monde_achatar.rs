// src/services/monde_achatar.rs
//
// Achatamento de relacionamentos JSON:API: copia atributos dos recursos em
// `included` para dentro dos recursos primários, sob nomes planos como
// `client_name` e `assignee_email`, para o front-end não precisar resolver
// ponteiros `(type, id)`.

use std::collections::HashMap;

use serde_json::{Map, Value};

// Relacionamento -> prefixo dos campos achatados.
const RELACIONAMENTOS: [(&str, &str); 4] = [
    ("person", "client"),
    ("assignee", "assignee"),
    ("category", "category"),
    ("author", "author"),
];

/// Transformação pura sobre um documento JSON:API `{data, included?}`.
///
/// Sem `included`, o documento volta intacto (o que torna a função
/// idempotente: um documento já achatado não tem mais `included` casado com
/// ponteiros novos). Ponteiros sem recurso correspondente são ignorados.
/// A ordem de `data` é preservada; funciona para `data` lista ou único.
pub fn achatar_relacionamentos(mut doc: Value) -> Value {
    let indice = match doc.get("included").and_then(Value::as_array) {
        Some(incluidos) => indexar_incluidos(incluidos),
        None => return doc,
    };
    if indice.is_empty() {
        return doc;
    }

    match doc.get_mut("data") {
        Some(Value::Array(recursos)) => {
            for recurso in recursos {
                achatar_recurso(recurso, &indice);
            }
        }
        Some(recurso @ Value::Object(_)) => achatar_recurso(recurso, &indice),
        _ => {}
    }

    doc
}

/// Índice `(type, id) -> attributes` dos recursos incluídos.
fn indexar_incluidos(incluidos: &[Value]) -> HashMap<(String, String), Map<String, Value>> {
    let mut indice = HashMap::new();
    for recurso in incluidos {
        let tipo = recurso.get("type").and_then(Value::as_str);
        let id = recurso.get("id").and_then(Value::as_str);
        let atributos = recurso.get("attributes").and_then(Value::as_object);
        if let (Some(tipo), Some(id), Some(atributos)) = (tipo, id, atributos) {
            indice.insert((tipo.to_string(), id.to_string()), atributos.clone());
        }
    }
    indice
}

fn achatar_recurso(recurso: &mut Value, indice: &HashMap<(String, String), Map<String, Value>>) {
    for (relacionamento, prefixo) in RELACIONAMENTOS {
        let ponteiro = recurso
            .get("relationships")
            .and_then(|r| r.get(relacionamento))
            .and_then(|r| r.get("data"));
        let Some(ponteiro) = ponteiro else { continue };

        let tipo = ponteiro.get("type").and_then(Value::as_str);
        let id = ponteiro.get("id").and_then(Value::as_str);
        let (Some(tipo), Some(id)) = (tipo, id) else { continue };

        let Some(atributos) = indice.get(&(tipo.to_string(), id.to_string())) else {
            continue;
        };

        // Categorias têm cor em vez de e-mail; o resto copia name/email.
        let campos: &[&str] = if relacionamento == "category" {
            &["name", "color"]
        } else {
            &["name", "email"]
        };

        let Some(destino) = recurso.get_mut("attributes").and_then(Value::as_object_mut) else {
            continue;
        };
        for campo in campos {
            if let Some(valor) = atributos.get(*campo) {
                destino.insert(format!("{prefixo}_{campo}"), valor.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tarefa_com_relacionamentos() -> Value {
        json!({
            "data": [{
                "type": "tasks",
                "id": "t1",
                "attributes": { "title": "Emitir passagem" },
                "relationships": {
                    "person": { "data": { "type": "people", "id": "p1" } },
                    "assignee": { "data": { "type": "people", "id": "p2" } },
                    "category": { "data": { "type": "task-categories", "id": "c1" } }
                }
            }],
            "included": [
                { "type": "people", "id": "p1",
                  "attributes": { "name": "Maria", "email": "maria@ex.com" } },
                { "type": "people", "id": "p2",
                  "attributes": { "name": "João", "email": "joao@ex.com" } },
                { "type": "task-categories", "id": "c1",
                  "attributes": { "name": "Urgente", "color": "#ff0000" } }
            ]
        })
    }

    #[test]
    fn copia_atributos_dos_incluidos() {
        let doc = achatar_relacionamentos(tarefa_com_relacionamentos());
        let attrs = &doc["data"][0]["attributes"];
        assert_eq!(attrs["client_name"], "Maria");
        assert_eq!(attrs["client_email"], "maria@ex.com");
        assert_eq!(attrs["assignee_name"], "João");
        assert_eq!(attrs["assignee_email"], "joao@ex.com");
        assert_eq!(attrs["category_name"], "Urgente");
        assert_eq!(attrs["category_color"], "#ff0000");
        // o atributo original continua lá
        assert_eq!(attrs["title"], "Emitir passagem");
    }

    #[test]
    fn documento_sem_included_volta_intacto() {
        let doc = json!({
            "data": [{ "type": "tasks", "id": "t1", "attributes": { "title": "X" } }]
        });
        assert_eq!(achatar_relacionamentos(doc.clone()), doc);
    }

    #[test]
    fn achatamento_e_idempotente() {
        let uma_vez = achatar_relacionamentos(tarefa_com_relacionamentos());
        // segunda passada: o documento achatado ainda carrega `included`,
        // mas reinserir os mesmos campos não muda nada
        let duas_vezes = achatar_relacionamentos(uma_vez.clone());
        assert_eq!(uma_vez, duas_vezes);
    }

    #[test]
    fn ponteiro_sem_recurso_correspondente_e_ignorado() {
        let doc = json!({
            "data": [{
                "type": "tasks",
                "id": "t1",
                "attributes": { "title": "X" },
                "relationships": {
                    "person": { "data": { "type": "people", "id": "fantasma" } }
                }
            }],
            "included": [
                { "type": "people", "id": "p1", "attributes": { "name": "Maria" } }
            ]
        });
        let achatado = achatar_relacionamentos(doc.clone());
        assert_eq!(achatado["data"][0]["attributes"], doc["data"][0]["attributes"]);
    }

    #[test]
    fn ordem_de_data_e_preservada() {
        let doc = json!({
            "data": [
                { "type": "tasks", "id": "t1", "attributes": {} },
                { "type": "tasks", "id": "t2", "attributes": {} },
                { "type": "tasks", "id": "t3", "attributes": {} }
            ],
            "included": [
                { "type": "people", "id": "p1", "attributes": { "name": "Maria" } }
            ]
        });
        let achatado = achatar_relacionamentos(doc);
        let ids: Vec<&str> = achatado["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn data_unico_tambem_e_achatado() {
        let doc = json!({
            "data": {
                "type": "tasks",
                "id": "t1",
                "attributes": { "title": "X" },
                "relationships": {
                    "assignee": { "data": { "type": "people", "id": "p1" } }
                }
            },
            "included": [
                { "type": "people", "id": "p1",
                  "attributes": { "name": "Ana", "email": "ana@ex.com" } }
            ]
        });
        let achatado = achatar_relacionamentos(doc);
        assert_eq!(achatado["data"]["attributes"]["assignee_name"], "Ana");
        assert_eq!(achatado["data"]["attributes"]["assignee_email"], "ana@ex.com");
    }
}
