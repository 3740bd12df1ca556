// src/services/identity.rs

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::common::error::AppError;

// Identidade extraída de um token aceito pelo provedor.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    pub id: String,
    pub email: Option<String>,
}

// O provedor de identidade é um colaborador externo: emite tokens no login,
// valida tokens e guarda credenciais. O papel do usuário nunca mora lá;
// papel é assunto do perfil da aplicação.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<TokenIdentity, AppError>;

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<TokenIdentity, AppError>;
}

// Estrutura de dados ("claims") dentro do JWT do provedor
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    exp: usize,
}

#[derive(Debug, Deserialize)]
struct AdminCreatedUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

// Implementação para provedores compatíveis com GoTrue: o token é validado
// localmente (HS256 com o segredo compartilhado do projeto) e a criação de
// usuário passa pela API admin com a service role key.
pub struct GotrueIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    service_role_key: String,
    jwt_secret: String,
}

impl GotrueIdentityProvider {
    pub fn new(base_url: String, service_role_key: String, jwt_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key,
            jwt_secret,
        }
    }
}

#[async_trait]
impl IdentityProvider for GotrueIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<TokenIdentity, AppError> {
        let mut validation = Validation::default();
        // O provedor emite aud "authenticated"; a audiência não entra na checagem.
        validation.validate_aud = false;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(TokenIdentity {
            id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<TokenIdentity, AppError> {
        let url = format!("{}/admin/users", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_role_key)
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "user_metadata": { "name": name },
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Repassa a mensagem do provedor como veio, quando der para extrair.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| {
                    ["msg", "message", "error_description", "error"]
                        .iter()
                        .find_map(|key| {
                            body.get(key).and_then(Value::as_str).map(str::to_string)
                        })
                })
                .unwrap_or(text);
            tracing::warn!("Provedor de identidade recusou a criação ({}): {}", status, message);
            return Err(AppError::Upstream(message));
        }

        let created: AdminCreatedUser = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        Ok(TokenIdentity {
            id: created.id,
            email: created.email,
        })
    }
}
