// src/db/fields_repo.rs

use std::sync::Arc;

use crate::{common::error::AppError, db::kv::KvStore, models::fields::FieldDefinition};

// O schema ativo mora inteiro em um único registro.
const FIELDS_KEY: &str = "config:fields";

// Repositório explícito do schema ativo de campos. Quem renderiza formulário
// busca de novo a cada uso; nenhuma cópia em cache é considerada atual.
#[derive(Clone)]
pub struct FieldRepository {
    kv: Arc<dyn KvStore>,
}

impl FieldRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    // Nunca configurado conta como schema vazio, não como erro.
    pub async fn get(&self) -> Result<Vec<FieldDefinition>, AppError> {
        match self.kv.get(FIELDS_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    // Substitui o array inteiro de uma vez (escrita única no armazém).
    // Leads existentes nunca são tocados por uma troca de schema.
    pub async fn replace(&self, fields: &[FieldDefinition]) -> Result<(), AppError> {
        self.kv.set(FIELDS_KEY, serde_json::to_value(fields)?).await
    }
}
