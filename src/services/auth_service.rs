// src/services/auth_service.rs
//
// O gateway de autenticação: faz o login contra o Monde, cria a sessão
// local e emite/valida o JWT próprio do Keeptur. A validade real do token
// local é delegada inteiramente à linha de sessão: sumiu a linha, morreu o
// token.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmpresaRepository, SessaoRepository},
    models::auth::{Claims, DadosUsuario, LoginPayload, LoginResponse, Sessao},
    services::monde_client::MondeClient,
    services::plano_service::PlanoService,
};

// O token do Monde vive 1 hora; a sessão local acompanha.
const VALIDADE_SESSAO_HORAS: i64 = 1;
// O JWT local é nominalmente mais longevo que a sessão; a checagem da linha
// em cada requisição é quem manda de verdade.
const VALIDADE_JWT_HORAS: i64 = 24;

/// Host da URL do servidor Monde, sem esquema.
fn host_do_servidor(server_url: &str) -> Result<String, AppError> {
    let url = Url::parse(server_url)
        .map_err(|e| anyhow::anyhow!("URL do servidor Monde inválida: {}", e))?;
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("URL do servidor Monde sem host: {}", server_url).into())
}

/// Monta o login esperado pelo Monde: `identificador@host`. Identificadores
/// que já vêm com `@` (e-mail completo) passam como estão.
fn montar_login_monde(identificador: &str, server_url: &str) -> Result<String, AppError> {
    if identificador.contains('@') {
        return Ok(identificador.to_string());
    }
    let host = host_do_servidor(server_url)?;
    Ok(format!("{identificador}@{host}"))
}

/// Extrai os dados denormalizados do usuário da resposta de token do Monde.
/// Tudo além do login é opcional; o Monde nem sempre manda.
fn extrair_dados_usuario(documento: &Value, login_padrao: &str) -> DadosUsuario {
    let atributos = &documento["data"]["attributes"];
    let texto = |campo: &str| atributos[campo].as_str().map(str::to_string);
    DadosUsuario {
        login: texto("login").unwrap_or_else(|| login_padrao.to_string()),
        email: texto("email"),
        nome: texto("name"),
        papel: texto("role"),
    }
}

fn assinar_token(segredo: &str, sessao_id: Uuid, empresa_id: Uuid) -> Result<String, AppError> {
    let agora = Utc::now();
    let expira = agora + chrono::Duration::hours(VALIDADE_JWT_HORAS);

    let claims = Claims {
        sessao_id,
        empresa_id,
        exp: expira.timestamp() as usize,
        iat: agora.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(segredo.as_ref()),
    )?)
}

fn verificar_token(segredo: &str, token: &str) -> Result<Claims, AppError> {
    let dados = decode::<Claims>(
        token,
        &DecodingKey::from_secret(segredo.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::TokenInvalido)?;

    Ok(dados.claims)
}

#[derive(Clone)]
pub struct AuthService {
    empresa_repo: EmpresaRepository,
    sessao_repo: SessaoRepository,
    plano_service: PlanoService,
    monde_client: MondeClient,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        empresa_repo: EmpresaRepository,
        sessao_repo: SessaoRepository,
        plano_service: PlanoService,
        monde_client: MondeClient,
        jwt_secret: String,
    ) -> Self {
        Self {
            empresa_repo,
            sessao_repo,
            plano_service,
            monde_client,
            jwt_secret,
        }
    }

    /// Login completo: credenciais no Monde, empresa find-or-create, sessão
    /// nova com a validade do token do Monde, JWT local por cima.
    pub async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, AppError> {
        let login_monde = montar_login_monde(&payload.email, &payload.server_url)?;
        let documento = self
            .monde_client
            .obter_token(&login_monde, &payload.password)
            .await?;

        let monde_token = documento["data"]["attributes"]["token"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Resposta de token do Monde sem data.attributes.token"))?
            .to_string();
        let dados_usuario = extrair_dados_usuario(&documento, &login_monde);

        let host = host_do_servidor(&payload.server_url)?;
        // o subdomínio identifica a empresa no Monde
        let slug = host.split('.').next().unwrap_or(&host).to_string();
        let empresa = self
            .empresa_repo
            .find_or_create(&slug, &payload.server_url, &slug)
            .await?;

        let has_active_plan = self
            .plano_service
            .empresa_tem_plano_ativo(empresa.id)
            .await?;

        let expira_em = Utc::now() + chrono::Duration::hours(VALIDADE_SESSAO_HORAS);
        let sessao = self
            .sessao_repo
            .create(empresa.id, &monde_token, None, expira_em, &dados_usuario)
            .await?;

        let token = assinar_token(&self.jwt_secret, sessao.id, empresa.id)?;

        Ok(LoginResponse {
            token,
            user: dados_usuario,
            empresa_id: empresa.id,
            has_active_plan,
            monde_token,
        })
    }

    /// Guarda de toda rota protegida: decodifica o JWT, busca a linha de
    /// sessão e confere o prazo. Sessão vencida é apagada na hora (limpeza
    /// preguiçosa) antes do erro subir.
    pub async fn authenticate(&self, token: &str) -> Result<Sessao, AppError> {
        let claims = verificar_token(&self.jwt_secret, token)?;

        let sessao = self
            .sessao_repo
            .find_by_id(claims.sessao_id)
            .await?
            .ok_or(AppError::SessaoNaoEncontrada)?;

        if sessao.expira_em < Utc::now() {
            self.sessao_repo.delete(sessao.id).await?;
            return Err(AppError::SessaoExpirada);
        }

        Ok(sessao)
    }

    /// Revogação é apagar a linha; repetir o logout não é erro.
    pub async fn logout(&self, sessao: &Sessao) -> Result<(), AppError> {
        self.sessao_repo.delete(sessao.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identificador_simples_ganha_o_host_do_servidor() {
        let login =
            montar_login_monde("joao", "https://empresa.monde.com.br").unwrap();
        assert_eq!(login, "joao@empresa.monde.com.br");
    }

    #[test]
    fn email_completo_passa_como_esta() {
        let login =
            montar_login_monde("joao@outra.com", "https://empresa.monde.com.br").unwrap();
        assert_eq!(login, "joao@outra.com");
    }

    #[test]
    fn url_sem_esquema_e_rejeitada() {
        assert!(montar_login_monde("joao", "empresa.monde.com.br").is_err());
    }

    #[test]
    fn claims_fazem_ida_e_volta_com_validade_de_24h() {
        let sessao_id = Uuid::new_v4();
        let empresa_id = Uuid::new_v4();

        let token = assinar_token("segredo-de-teste", sessao_id, empresa_id).unwrap();
        let claims = verificar_token("segredo-de-teste", &token).unwrap();

        assert_eq!(claims.sessao_id, sessao_id);
        assert_eq!(claims.empresa_id, empresa_id);
        let validade = claims.exp - claims.iat;
        assert_eq!(validade, 24 * 3600);
    }

    #[test]
    fn token_assinado_com_outro_segredo_e_invalido() {
        let token = assinar_token("segredo-a", Uuid::new_v4(), Uuid::new_v4()).unwrap();
        let erro = verificar_token("segredo-b", &token).unwrap_err();
        assert!(matches!(erro, AppError::TokenInvalido));
    }

    #[test]
    fn token_truncado_e_invalido() {
        assert!(matches!(
            verificar_token("segredo", "nao-e-um-jwt").unwrap_err(),
            AppError::TokenInvalido
        ));
    }

    #[test]
    fn dados_do_usuario_vem_dos_atributos_do_token() {
        let documento = json!({
            "data": {
                "type": "tokens",
                "attributes": {
                    "token": "abc",
                    "login": "joao@empresa.monde.com.br",
                    "name": "João Silva",
                    "role": "agent"
                }
            }
        });
        let dados = extrair_dados_usuario(&documento, "fallback");
        assert_eq!(dados.login, "joao@empresa.monde.com.br");
        assert_eq!(dados.nome.as_deref(), Some("João Silva"));
        assert_eq!(dados.papel.as_deref(), Some("agent"));
        assert_eq!(dados.email, None);
    }

    #[test]
    fn login_padrao_entra_quando_o_monde_nao_manda() {
        let documento = json!({ "data": { "attributes": { "token": "abc" } } });
        let dados = extrair_dados_usuario(&documento, "joao@empresa.monde.com.br");
        assert_eq!(dados.login, "joao@empresa.monde.com.br");
    }
}
