// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Status livre: qualquer status pode virar qualquer outro, não há ordem
// de transição imposta.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
    Converted,
}

// --- LEAD (O Dado) ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Lead {
    pub id: Uuid,

    // Dados livres, indexados pelo nome do campo ativo na hora do
    // preenchimento. O schema de campos é apenas sugestivo: leads antigos
    // nunca são revalidados nem migrados quando o schema muda.
    #[schema(value_type = Object, example = json!({"Company": "Acme"}))]
    pub data: Map<String, Value>,

    pub status: LeadStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    // Imutáveis após a criação. O payload de update nem possui esses
    // campos, então não há como sobrescrevê-los via API.
    pub created_by: String,
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

// Dados para criação de um lead
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeadPayload {
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"Company": "Acme"}))]
    pub data: Map<String, Value>,

    // Ausente vira New
    pub status: Option<LeadStatus>,

    pub assigned_to: Option<String>,
}

// Update parcial: campo presente substitui o valor inteiro, campo ausente
// permanece como está. `data` é trocado por completo, não mesclado chave a
// chave.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLeadPayload {
    #[schema(value_type = Option<Object>)]
    pub data: Option<Map<String, Value>>,

    pub status: Option<LeadStatus>,

    pub assigned_to: Option<String>,
}
