// src/models/fields.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::common::error::AppError;

// --- ENUMS ---

// Tipos de campo que o formulário de leads sabe renderizar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Email,
    Select,
    Date,
    Textarea,
}

// --- DEFINIÇÕES (O Molde) ---

// Uma coluna customizada exibida em todo formulário de lead.
// O conjunto ativo é sempre gravado e substituído como um array inteiro;
// não existe versionamento por campo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct FieldDefinition {
    #[schema(example = "Company")]
    pub name: String,

    #[serde(rename = "type")]
    #[schema(example = "text")]
    pub field_type: FieldType,

    pub required: bool,

    // Opções para Selects (Ex: ["A", "B"]). Só faz sentido quando
    // field_type == Select, mas isso não é imposto no armazenamento.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = json!(["P", "M", "G"]))]
    pub options: Option<Vec<String>>,
}

// Validação do schema ativo feita no servidor: nome vazio ou repetido
// derruba a troca inteira, já que o array substitui o registro como um todo.
pub fn validate_schema(fields: &[FieldDefinition]) -> Result<(), AppError> {
    let mut seen = std::collections::HashSet::new();

    for field in fields {
        let name = field.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidPayload(
                "Field names must not be empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(AppError::InvalidPayload(format!(
                "Duplicate field name '{}'",
                name
            )));
        }
    }

    Ok(())
}
