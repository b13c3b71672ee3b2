// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{EmpresaRepository, PlanoRepository, SessaoRepository},
    services::{auth_service::AuthService, monde_client::MondeClient, plano_service::PlanoService},
};

const MONDE_API_URL_PADRAO: &str = "https://web.monde.com.br/api/v2";

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub plano_service: PlanoService,
    pub monde_client: MondeClient,
    pub porta: u16,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let monde_api_url =
            env::var("MONDE_API_URL").unwrap_or_else(|_| MONDE_API_URL_PADRAO.to_string());
        let porta: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let empresa_repo = EmpresaRepository::new(db_pool.clone());
        let plano_repo = PlanoRepository::new(db_pool.clone());
        let sessao_repo = SessaoRepository::new(db_pool.clone());

        let monde_client = MondeClient::new(monde_api_url)?;
        let plano_service = PlanoService::new(plano_repo, empresa_repo.clone());
        let auth_service = AuthService::new(
            empresa_repo,
            sessao_repo,
            plano_service.clone(),
            monde_client.clone(),
            jwt_secret,
        );

        Ok(Self {
            db_pool,
            auth_service,
            plano_service,
            monde_client,
            porta,
        })
    }
}
