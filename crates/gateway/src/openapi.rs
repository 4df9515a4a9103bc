//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{auth_handler, health_handler};
use domain::UserResponse;

/// OpenAPI documentation for the auth service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth Service",
        version = "0.1.0",
        description = "Account registration, password login and bearer-token lookup",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        health_handler::health_check,
        auth_handler::sign_up,
        auth_handler::sign_in,
        auth_handler::get_self,
    ),
    components(
        schemas(
            UserResponse,
            health_handler::HealthResponse,
            auth_handler::AuthRequest,
            auth_handler::MessageResponse,
            auth_handler::TokenResponse,
            auth_handler::SelfResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Registration, login and token lookup")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /auth/sign-in/"))
                        .build(),
                ),
            );
        }
    }
}
