// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Setup ---
        handlers::setup::setup,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::create_user,
        handlers::users::list_users,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,

        // --- Fields ---
        handlers::fields::get_fields,
        handlers::fields::replace_fields,
    ),
    components(
        schemas(
            // --- Users ---
            models::profile::Role,
            models::profile::UserProfile,
            models::profile::CreateUserPayload,
            models::profile::SetupPayload,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,

            // --- Fields ---
            models::fields::FieldType,
            models::fields::FieldDefinition,
        )
    ),
    tags(
        (name = "Setup", description = "Bootstrap inicial da instância"),
        (name = "Users", description = "Perfis e papéis"),
        (name = "Leads", description = "Gestão de Leads"),
        (name = "Fields", description = "Configuração dos campos customizados")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
