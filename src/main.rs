//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger antes de qualquer outra coisa.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Semeia os planos de tabela quando o banco está vazio
    app_state
        .plano_service
        .seed_planos_iniciais()
        .await
        .expect("Falha ao semear os planos iniciais.");

    // Rotas de autenticação: o login é público, o resto exige o Bearer local
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/logout",
            post(handlers::auth::logout).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        )
        .route(
            "/me",
            get(handlers::auth::get_me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    // Rotas de planos (públicas: a tela de assinatura aparece antes do gate)
    let plan_routes = Router::new()
        .route("/", get(handlers::planos::listar_planos))
        .route("/subscribe", post(handlers::planos::assinar))
        .route("/status/{empresa_id}", get(handlers::planos::status_plano));

    // Rotas proxied do Monde, todas atrás do guard de sessão
    let monde_routes = Router::new()
        .route(
            "/tarefas",
            get(handlers::monde::listar_tarefas).post(handlers::monde::criar_tarefa),
        )
        .route("/tarefas/stats", get(handlers::monde::stats_tarefas))
        // PUT e DELETE no mesmo path, registrados uma única vez
        .route(
            "/tarefas/{id}",
            put(handlers::monde::atualizar_tarefa).delete(handlers::monde::excluir_tarefa),
        )
        .route("/tarefas/{id}/historico", get(handlers::monde::historico_tarefa))
        .route("/pessoas", get(handlers::monde::listar_pessoas))
        .route("/clientes", get(handlers::monde::listar_pessoas))
        .route("/categorias", get(handlers::monde::listar_categorias))
        .route("/usuarios", get(handlers::monde::listar_usuarios))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/docs/openapi.json",
            get(|| async { Json(docs::ApiDoc::openapi()) }),
        )
        .nest("/api/auth", auth_routes)
        .nest("/api/plans", plan_routes)
        .nest("/api/monde", monde_routes)
        .with_state(app_state.clone());

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", app_state.porta);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
