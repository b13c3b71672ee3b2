// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Planos ---
        handlers::planos::listar_planos,
        handlers::planos::assinar,
        handlers::planos::status_plano,

        // --- Monde ---
        handlers::monde::listar_tarefas,
        handlers::monde::criar_tarefa,
        handlers::monde::atualizar_tarefa,
        handlers::monde::excluir_tarefa,
        handlers::monde::stats_tarefas,
        handlers::monde::historico_tarefa,
        handlers::monde::listar_pessoas,
        handlers::monde::listar_categorias,
        handlers::monde::listar_usuarios,
    ),
    components(
        schemas(
            models::auth::LoginPayload,
            models::auth::LoginResponse,
            models::auth::DadosUsuario,
            models::empresa::Empresa,
            models::planos::Plano,
            models::planos::Assinatura,
            models::planos::Pagamento,
            models::planos::AssinarPayload,
            models::planos::AssinarResposta,
            models::planos::StatusPlanoResposta,
            models::monde::StatsTarefas,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login contra o Monde e sessão local"),
        (name = "Planos", description = "Planos, assinaturas e entitlement"),
        (name = "Monde", description = "Recursos do Monde proxied e achatados"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
