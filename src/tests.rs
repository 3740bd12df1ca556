//! Testes de integração: sobem o app inteiro com o armazém em memória e um
//! provedor de identidade dublê, e batem nas rotas por HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::config::AppState;
use crate::create_router;
use crate::db::MemoryKvStore;
use crate::services::identity::{IdentityProvider, TokenIdentity};

// Provedor de identidade dublê: qualquer token no formato "token:<sub>" é
// aceito, e a criação de credenciais devolve um subject novo.
struct StubIdentityProvider;

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<TokenIdentity, AppError> {
        match token.strip_prefix("token:") {
            Some(sub) if !sub.is_empty() => Ok(TokenIdentity {
                id: sub.to_string(),
                email: None,
            }),
            _ => Err(AppError::Unauthorized),
        }
    }

    async fn create_user(
        &self,
        email: &str,
        _password: &str,
        _name: &str,
    ) -> Result<TokenIdentity, AppError> {
        Ok(TokenIdentity {
            id: Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
        })
    }
}

struct TestFixture {
    client: Client,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        let kv = Arc::new(MemoryKvStore::new());
        let state = AppState::with_parts(kv, Arc::new(StubIdentityProvider));
        let app = create_router(state);

        // Porta aleatória para os testes rodarem em paralelo
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url: format!("http://{}", addr),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(id: &str) -> String {
        format!("token:{}", id)
    }

    // Roda o bootstrap e devolve o token do superadmin criado.
    async fn setup_superadmin(&self) -> String {
        let resp = self
            .client
            .post(self.url("/api/setup"))
            .json(&json!({ "email": "root@acme.com", "password": "123456", "name": "Root" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["role"], "superadmin");
        Self::token(body["id"].as_str().unwrap())
    }

    // Cria uma conta com o papel pedido e devolve o token dela.
    async fn create_account(&self, caller_token: &str, email: &str, role: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/users"))
            .bearer_auth(caller_token)
            .json(&json!({ "email": email, "password": "123456", "name": email, "role": role }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        Self::token(body["id"].as_str().unwrap())
    }

    async fn create_lead(&self, token: &str, data: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/api/leads"))
            .bearer_auth(token)
            .json(&json!({ "data": data }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }
}

fn parse_ts(value: &Value) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn health_responde_sem_token() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn rotas_protegidas_exigem_token_valido() {
    let fixture = TestFixture::new().await;

    // Sem Authorization
    let resp = fixture
        .client
        .get(fixture.url("/api/leads"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");

    // Token que o provedor rejeita
    let resp = fixture
        .client
        .get(fixture.url("/api/leads"))
        .bearer_auth("lixo")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn setup_funciona_exatamente_uma_vez() {
    let fixture = TestFixture::new().await;

    fixture.setup_superadmin().await;

    // Segunda tentativa, payload qualquer
    let resp = fixture
        .client
        .post(fixture.url("/api/setup"))
        .json(&json!({ "email": "outro@acme.com", "password": "123456", "name": "Outro" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Setup already complete");
}

#[tokio::test]
async fn me_devolve_perfil_e_papel() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/me"))
        .bearer_auth(&root_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["email"], "root@acme.com");
    assert_eq!(body["role"], "superadmin");

    // Token válido sem perfil gravado: autentica com papel mínimo
    let resp = fixture
        .client
        .get(fixture.url("/api/me"))
        .bearer_auth(TestFixture::token("desconhecido"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn fields_grava_e_devolve_o_mesmo_array() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    let schema = json!([
        { "name": "Company", "type": "text", "required": true },
        { "name": "Size", "type": "select", "required": false, "options": ["P", "M", "G"] }
    ]);

    let resp = fixture
        .client
        .post(fixture.url("/api/fields"))
        .bearer_auth(&root_token)
        .json(&schema)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let echoed: Value = resp.json().await.unwrap();
    assert_eq!(echoed, schema);

    // Qualquer autenticado lê o schema, mesmo sem ser admin
    let user_token = fixture
        .create_account(&root_token, "ana@acme.com", "user")
        .await;
    let resp = fixture
        .client
        .get(fixture.url("/api/fields"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, schema);
}

#[tokio::test]
async fn fields_rejeita_nome_vazio_e_duplicado() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/fields"))
        .bearer_auth(&root_token)
        .json(&json!([{ "name": "  ", "type": "text", "required": false }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .client
        .post(fixture.url("/api/fields"))
        .bearer_auth(&root_token)
        .json(&json!([
            { "name": "Company", "type": "text", "required": false },
            { "name": "Company", "type": "number", "required": false }
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn lead_criado_aparece_na_listagem_com_autor() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;
    let user_token = fixture
        .create_account(&root_token, "ana@acme.com", "user")
        .await;

    let lead = fixture
        .create_lead(&user_token, json!({ "Company": "Acme" }))
        .await;
    assert_eq!(lead["status"], "New");
    assert_eq!(lead["created_at"], lead["updated_at"]);

    let resp = fixture
        .client
        .get(fixture.url("/api/leads"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let leads: Value = resp.json().await.unwrap();
    let listed = leads
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"] == lead["id"])
        .expect("lead criado não apareceu na listagem");

    // created_by vem do token de quem criou, não do corpo
    assert_eq!(listed["created_by"], lead["created_by"]);
    assert_eq!(
        listed["created_by"].as_str().unwrap(),
        user_token.strip_prefix("token:").unwrap()
    );
}

#[tokio::test]
async fn listagem_vem_com_mais_recentes_primeiro() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    let primeiro = fixture.create_lead(&root_token, json!({ "n": 1 })).await;
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    let segundo = fixture.create_lead(&root_token, json!({ "n": 2 })).await;

    let resp = fixture
        .client
        .get(fixture.url("/api/leads"))
        .bearer_auth(&root_token)
        .send()
        .await
        .unwrap();
    let leads: Value = resp.json().await.unwrap();
    let ids: Vec<&str> = leads
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![segundo["id"].as_str().unwrap(), primeiro["id"].as_str().unwrap()]);
}

#[tokio::test]
async fn update_faz_merge_raso_e_preserva_o_envelope() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    let lead = fixture
        .create_lead(&root_token, json!({ "Company": "Acme" }))
        .await;
    let id = lead["id"].as_str().unwrap();

    // Tentativa de sobrescrever o envelope vai junto no corpo e é ignorada
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/leads/{}", id)))
        .bearer_auth(&root_token)
        .json(&json!({
            "status": "Converted",
            "created_by": "intruso",
            "created_at": "1999-01-01T00:00:00Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();

    assert_eq!(updated["status"], "Converted");
    assert_eq!(updated["data"], lead["data"]);
    assert_eq!(updated["created_by"], lead["created_by"]);
    assert_eq!(updated["created_at"], lead["created_at"]);
    assert!(parse_ts(&updated["updated_at"]) > parse_ts(&lead["updated_at"]));
}

#[tokio::test]
async fn update_de_lead_inexistente_da_404() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    let resp = fixture
        .client
        .put(fixture.url("/api/leads/nao-existe"))
        .bearer_auth(&root_token)
        .json(&json!({ "status": "Lost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Lead not found");
}

#[tokio::test]
async fn delete_e_idempotente_e_restrito_a_admin() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;
    let user_token = fixture
        .create_account(&root_token, "ana@acme.com", "user")
        .await;

    let lead = fixture.create_lead(&user_token, json!({})).await;
    let id = lead["id"].as_str().unwrap();

    // Papel user não deleta, nem o próprio lead
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/leads/{}", id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Forbidden");

    // Admin deleta; repetir a remoção continua sendo sucesso
    for _ in 0..2 {
        let resp = fixture
            .client
            .delete(fixture.url(&format!("/api/leads/{}", id)))
            .bearer_auth(&root_token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
    }
}

#[tokio::test]
async fn papel_user_cria_e_lista_leads_mas_nao_administra() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;
    let user_token = fixture
        .create_account(&root_token, "ana@acme.com", "user")
        .await;

    // Pode criar e listar
    fixture.create_lead(&user_token, json!({})).await;
    let resp = fixture
        .client
        .get(fixture.url("/api/leads"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Não pode criar usuários nem trocar o schema
    let resp = fixture
        .client
        .post(fixture.url("/api/users"))
        .bearer_auth(&user_token)
        .json(&json!({ "email": "x@acme.com", "password": "123456", "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = fixture
        .client
        .post(fixture.url("/api/fields"))
        .bearer_auth(&user_token)
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = fixture
        .client
        .get(fixture.url("/api/users"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn admin_nao_concede_papel_acima_de_user() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;
    let admin_token = fixture
        .create_account(&root_token, "chefe@acme.com", "admin")
        .await;

    // Admin criando user comum: ok
    fixture
        .create_account(&admin_token, "ana@acme.com", "user")
        .await;

    // Admin tentando criar outro admin: barrado no servidor
    let resp = fixture
        .client
        .post(fixture.url("/api/users"))
        .bearer_auth(&admin_token)
        .json(&json!({ "email": "b@acme.com", "password": "123456", "name": "B", "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Superadmin pode
    fixture
        .create_account(&root_token, "c@acme.com", "admin")
        .await;

    let resp = fixture
        .client
        .get(fixture.url("/api/users"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let profiles: Value = resp.json().await.unwrap();
    assert!(profiles.as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn payload_de_usuario_invalido_da_400() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/users"))
        .bearer_auth(&root_token)
        .json(&json!({ "email": "nao-e-email", "password": "123", "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["details"].is_object());
}

#[tokio::test]
async fn trocar_o_schema_nunca_mexe_nos_leads_gravados() {
    let fixture = TestFixture::new().await;
    let root_token = fixture.setup_superadmin().await;

    // Schema com "Company", lead preenchido com ele
    let resp = fixture
        .client
        .post(fixture.url("/api/fields"))
        .bearer_auth(&root_token)
        .json(&json!([{ "name": "Company", "type": "text", "required": true }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let lead = fixture
        .create_lead(&root_token, json!({ "Company": "Acme" }))
        .await;

    // Remove "Company" do schema
    let resp = fixture
        .client
        .post(fixture.url("/api/fields"))
        .bearer_auth(&root_token)
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // O lead antigo continua com o dado intacto
    let resp = fixture
        .client
        .get(fixture.url("/api/leads"))
        .bearer_auth(&root_token)
        .send()
        .await
        .unwrap();
    let leads: Value = resp.json().await.unwrap();
    let listed = leads
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"] == lead["id"])
        .unwrap();
    assert_eq!(listed["data"]["Company"], "Acme");
}
