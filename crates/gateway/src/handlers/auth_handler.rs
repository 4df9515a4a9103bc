//! Authentication handlers.

use std::time::Instant;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::UserResponse;

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Sign-in / sign-up request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthRequest {
    /// User email address
    #[validate(length(min = 1, message = "email is required"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "pw123")]
    pub password: String,
}

/// Confirmation message
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "user registered")]
    pub message: String,
}

/// Issued bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Value for the `Authorization` header
    #[schema(example = "Bearer eyJhbGciOiJIUzUxMiJ9...")]
    pub token: String,
}

/// Account behind the presented token
#[derive(Debug, Serialize, ToSchema)]
pub struct SelfResponse {
    pub user: UserResponse,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up/", post(sign_up))
        .route("/sign-in/", post(sign_in))
        .route("/self/", get(get_self))
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/sign-up/",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Invalid body or email"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let start = Instant::now();
    info!(layer = "http", "handling signup request");

    if let Err(e) = state
        .auth_service
        .sign_up(&payload.email, &payload.password)
        .await
    {
        warn!(
            layer = "http",
            email = %payload.email,
            error = %e,
            duration_ms = elapsed_ms(start),
            "failed to register user"
        );
        return Err(e);
    }

    info!(
        layer = "http",
        email = %payload.email,
        duration_ms = elapsed_ms(start),
        "user signed up successfully"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "user registered".to_string(),
        }),
    ))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/sign-in/",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let start = Instant::now();
    info!(layer = "http", "handling signin request");

    let token = match state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            warn!(
                layer = "http",
                email = %payload.email,
                error = %e,
                duration_ms = elapsed_ms(start),
                "failed to authorize user"
            );
            return Err(e);
        }
    };

    info!(
        layer = "http",
        email = %payload.email,
        duration_ms = elapsed_ms(start),
        "user signed in successfully"
    );

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Resolve the bearer token to its account
#[utoipa::path(
    get,
    path = "/auth/self/",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token owner", body = SelfResponse),
        (status = 401, description = "Invalid authorization token"),
        (status = 404, description = "Account could not be retrieved")
    )
)]
pub async fn get_self(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<SelfResponse>> {
    let start = Instant::now();
    info!(layer = "http", "handling get self request");

    // A missing or non-ASCII header is handed over as empty and rejected downstream
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let user = match state.auth_service.self_lookup(authorization).await {
        Ok(user) => user,
        Err(e) => {
            warn!(
                layer = "http",
                error = %e,
                duration_ms = elapsed_ms(start),
                "failed to get user"
            );
            return Err(e);
        }
    };

    info!(
        layer = "http",
        email = %user.email,
        duration_ms = elapsed_ms(start),
        "successfully retrieved self information"
    );

    Ok(Json(SelfResponse {
        user: UserResponse::from(user),
    }))
}
