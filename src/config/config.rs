// src/config/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{FieldRepository, LeadRepository, MemoryKvStore, PgKvStore, ProfileRepository},
    db::kv::KvStore,
    services::{
        account::AccountService,
        identity::{GotrueIdentityProvider, IdentityProvider},
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub lead_repo: LeadRepository,
    pub profile_repo: ProfileRepository,
    pub field_repo: FieldRepository,
    pub account_service: AccountService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o estado
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("AUTH_JWT_SECRET")?;
        let auth_base_url = env::var("AUTH_BASE_URL")?;
        let service_role_key = env::var("AUTH_SERVICE_ROLE_KEY")?;

        // KV_BACKEND=memory troca o Postgres por um armazém em memória
        // (desenvolvimento local; os dados morrem com o processo).
        let kv: Arc<dyn KvStore> = match env::var("KV_BACKEND").as_deref() {
            Ok("memory") => {
                tracing::warn!("⚠️  Armazém chave-valor em memória: nada será persistido!");
                Arc::new(MemoryKvStore::new())
            }
            _ => {
                let database_url = env::var("DATABASE_URL")?;
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(&database_url)
                    .await?;

                sqlx::migrate!().run(&db_pool).await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                Arc::new(PgKvStore::new(db_pool))
            }
        };

        let identity: Arc<dyn IdentityProvider> = Arc::new(GotrueIdentityProvider::new(
            auth_base_url,
            service_role_key,
            jwt_secret,
        ));

        Ok(Self::with_parts(kv, identity))
    }

    // Monta o grafo de dependências a partir dos dois colaboradores externos.
    // Os testes de integração entram por aqui com dublês.
    pub fn with_parts(kv: Arc<dyn KvStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        let lead_repo = LeadRepository::new(kv.clone());
        let profile_repo = ProfileRepository::new(kv.clone());
        let field_repo = FieldRepository::new(kv.clone());
        let account_service = AccountService::new(identity.clone(), profile_repo.clone());

        Self {
            identity,
            lead_repo,
            profile_repo,
            field_repo,
            account_service,
        }
    }
}
