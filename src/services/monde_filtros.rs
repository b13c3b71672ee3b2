// src/services/monde_filtros.rs
//
// Tradução do vocabulário de filtros local para o DSL `filter[...]` da API
// do Monde. O front-end antigo mandava os parâmetros ora "pelados"
// (`assignee=me`), ora já na grafia `filter[assignee]=me`; aceitamos as duas.

use std::collections::HashMap;

/// Busca um parâmetro local nas duas grafias aceitas.
fn parametro<'a>(params: &'a HashMap<String, String>, nome: &str) -> Option<&'a str> {
    params
        .get(nome)
        .or_else(|| params.get(&format!("filter[{nome}]")))
        .map(String::as_str)
}

/// Tabela fixa de situações. Valores desconhecidos passam adiante sem
/// tradução; o Monde é quem decide o que fazer com eles.
fn traduzir_situacao(local: &str) -> &str {
    match local {
        "open" => "active",
        "concluded" => "completed",
        "archived" => "archived",
        outro => outro,
    }
}

/// Monta a query string de filtros para `GET tasks`.
///
/// Escopo de atribuição: `all=true` remove o filtro (visão da empresa
/// inteira); `created_by=me` vira `filter[assigned]=author`; qualquer outro
/// caso (incluindo `assignee=me` e a ausência total de parâmetro) cai no
/// padrão `filter[assigned]=user_tasks`. Os demais filtros só entram quando
/// presentes, um `filter[x]` por parâmetro local.
pub fn traduzir_filtros(params: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = Vec::new();

    let visao_geral = parametro(params, "all") == Some("true");
    if !visao_geral {
        let escopo = if parametro(params, "created_by") == Some("me") {
            "author"
        } else {
            "user_tasks"
        };
        query.push(("filter[assigned]".to_string(), escopo.to_string()));
    }

    if let Some(situacao) = parametro(params, "situation") {
        query.push((
            "filter[situation]".to_string(),
            traduzir_situacao(situacao).to_string(),
        ));
    }

    // Repasses diretos: nome local -> nome do filtro no Monde.
    const REPASSES: [(&str, &str); 6] = [
        ("category_id", "category"),
        ("responsible_id", "responsible"),
        ("client_id", "person"),
        ("start_date", "start_date"),
        ("end_date", "end_date"),
        ("search", "search"),
    ];
    for (local, monde) in REPASSES {
        if let Some(valor) = parametro(params, local) {
            query.push((format!("filter[{monde}]"), valor.to_string()));
        }
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pares: &[(&str, &str)]) -> HashMap<String, String> {
        pares
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn valor<'a>(query: &'a [(String, String)], chave: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(k, _)| k == chave)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn assignee_me_vira_user_tasks() {
        let query = traduzir_filtros(&params(&[("assignee", "me")]));
        assert_eq!(valor(&query, "filter[assigned]"), Some("user_tasks"));
    }

    #[test]
    fn created_by_me_vira_author() {
        let query = traduzir_filtros(&params(&[("created_by", "me")]));
        assert_eq!(valor(&query, "filter[assigned]"), Some("author"));
    }

    #[test]
    fn created_by_na_grafia_filter_tambem_funciona() {
        let query = traduzir_filtros(&params(&[("filter[created_by]", "me")]));
        assert_eq!(valor(&query, "filter[assigned]"), Some("author"));
    }

    #[test]
    fn all_true_remove_o_filtro_de_atribuicao() {
        let query = traduzir_filtros(&params(&[("all", "true")]));
        assert_eq!(valor(&query, "filter[assigned]"), None);
    }

    #[test]
    fn sem_parametro_de_atribuicao_usa_user_tasks() {
        let query = traduzir_filtros(&HashMap::new());
        assert_eq!(valor(&query, "filter[assigned]"), Some("user_tasks"));
        // e nada além do escopo padrão
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn situacoes_seguem_a_tabela_fixa() {
        for (local, monde) in [
            ("open", "active"),
            ("concluded", "completed"),
            ("archived", "archived"),
        ] {
            let query = traduzir_filtros(&params(&[("situation", local)]));
            assert_eq!(valor(&query, "filter[situation]"), Some(monde));
        }
    }

    #[test]
    fn situacao_desconhecida_passa_adiante() {
        let query = traduzir_filtros(&params(&[("situation", "whatever")]));
        assert_eq!(valor(&query, "filter[situation]"), Some("whatever"));
    }

    #[test]
    fn repasses_so_entram_quando_presentes() {
        let query = traduzir_filtros(&params(&[
            ("category_id", "42"),
            ("client_id", "7"),
            ("search", "viagem"),
        ]));
        assert_eq!(valor(&query, "filter[category]"), Some("42"));
        assert_eq!(valor(&query, "filter[person]"), Some("7"));
        assert_eq!(valor(&query, "filter[search]"), Some("viagem"));
        assert_eq!(valor(&query, "filter[responsible]"), None);
        assert_eq!(valor(&query, "filter[start_date]"), None);
        assert_eq!(valor(&query, "filter[end_date]"), None);
    }

    #[test]
    fn datas_sao_repassadas() {
        let query = traduzir_filtros(&params(&[
            ("start_date", "2025-01-01"),
            ("end_date", "2025-01-31"),
        ]));
        assert_eq!(valor(&query, "filter[start_date]"), Some("2025-01-01"));
        assert_eq!(valor(&query, "filter[end_date]"), Some("2025-01-31"));
    }
}
