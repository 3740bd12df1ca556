// src/db/profile_repo.rs

use std::sync::Arc;

use crate::{common::error::AppError, db::kv::KvStore, models::profile::UserProfile};

fn profile_key(id: &str) -> String {
    format!("user:{}", id)
}

// Perfis da aplicação, chaveados pelo subject id do provedor de identidade.
#[derive(Clone)]
pub struct ProfileRepository {
    kv: Arc<dyn KvStore>,
}

impl ProfileRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn find(&self, id: &str) -> Result<Option<UserProfile>, AppError> {
        let value = self.kv.get(&profile_key(id)).await?;
        value
            .map(serde_json::from_value)
            .transpose()
            .map_err(AppError::from)
    }

    pub async fn save(&self, profile: &UserProfile) -> Result<(), AppError> {
        self.kv
            .set(&profile_key(&profile.id), serde_json::to_value(profile)?)
            .await
    }

    // Sem ordenação definida, igual ao contrato da rota.
    pub async fn list(&self) -> Result<Vec<UserProfile>, AppError> {
        let raw = self.kv.get_by_prefix("user:").await?;
        let profiles = raw
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<UserProfile>, _>>()?;
        Ok(profiles)
    }

    // Guarda do bootstrap: "algum perfil existe?" via varredura de prefixo.
    // Não é um flag persistido; duas chamadas concorrentes de primeiro setup
    // podem passar as duas (janela aceita, ver DESIGN.md).
    pub async fn any_exists(&self) -> Result<bool, AppError> {
        let raw = self.kv.get_by_prefix("user:").await?;
        Ok(!raw.is_empty())
    }
}
