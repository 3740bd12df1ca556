// src/db/lead_repo.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::kv::KvStore,
    models::lead::{CreateLeadPayload, Lead, UpdateLeadPayload},
};

fn lead_key(id: &str) -> String {
    format!("lead:{}", id)
}

// O repositório de leads, camada fina sobre o armazém chave-valor.
// Não existe cópia em memória: toda leitura busca de novo no armazém.
#[derive(Clone)]
pub struct LeadRepository {
    kv: Arc<dyn KvStore>,
}

impl LeadRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    // Todos os leads, mais recentes primeiro. Não há filtro por dono:
    // qualquer papel enxerga todos os leads.
    pub async fn list(&self) -> Result<Vec<Lead>, AppError> {
        let raw = self.kv.get_by_prefix("lead:").await?;
        let mut leads = raw
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Lead>, _>>()?;
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    pub async fn create(
        &self,
        payload: CreateLeadPayload,
        created_by: &str,
    ) -> Result<Lead, AppError> {
        let now = Utc::now();
        let lead = Lead {
            id: Uuid::new_v4(),
            data: payload.data,
            status: payload.status.unwrap_or_default(),
            assigned_to: payload.assigned_to,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.kv
            .set(&lead_key(&lead.id.to_string()), serde_json::to_value(&lead)?)
            .await?;
        Ok(lead)
    }

    // Merge raso sobre o registro existente: cada campo presente no payload
    // substitui o valor gravado por inteiro, os ausentes permanecem.
    // Último a gravar vence; não há token de concorrência.
    pub async fn update(&self, id: &str, changes: UpdateLeadPayload) -> Result<Lead, AppError> {
        let key = lead_key(id);
        let existing = self.kv.get(&key).await?.ok_or(AppError::LeadNotFound)?;
        let mut lead: Lead = serde_json::from_value(existing)?;

        if let Some(data) = changes.data {
            lead.data = data;
        }
        if let Some(status) = changes.status {
            lead.status = status;
        }
        if let Some(assigned_to) = changes.assigned_to {
            lead.assigned_to = Some(assigned_to);
        }
        lead.updated_at = Utc::now();

        self.kv.set(&key, serde_json::to_value(&lead)?).await?;
        Ok(lead)
    }

    // Idempotente: deletar um id inexistente também é sucesso.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.kv.delete(&lead_key(id)).await
    }
}
