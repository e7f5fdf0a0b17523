use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use models::Role;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use service::auth::credentials::verify_token;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};

use crate::envelope::Mutation;
use crate::errors::ApiError;
use crate::extract::{required, ApiJson};
use crate::policy::AuthContext;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: ServerAuthConfig) -> Self {
        Self { db, auth }
    }

    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        AuthService::new(
            Arc::new(SeaOrmAuthRepository::new(self.db.clone())),
            AuthConfig { jwt_secret: self.auth.jwt_secret.clone(), token_ttl_secs: self.auth.token_ttl_secs },
        )
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredView {
    pub name: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionProfile {
    pub name: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth: bool,
    pub token: String,
    pub data: SessionProfile,
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "auth", request_body = RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Invalid body or username taken")))]
pub async fn register(
    State(state): State<ServerState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Mutation<RegisteredView>>), ApiError> {
    let input = RegisterInput {
        name: required(body.name)?,
        username: required(body.username)?,
        email: required(body.email)?,
        password: required(body.password)?,
    };
    let registered = state.auth_service().register(input).await?;
    let view = RegisteredView {
        name: registered.name,
        username: registered.username,
        email: registered.email,
        role: registered.role,
    };
    Ok(Mutation::created("User registered successfully", registered.result, view))
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth", request_body = LoginRequest, responses((status = 200, description = "Logged in", body = LoginResponse), (status = 401, description = "Invalid username or password")))]
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let input = LoginInput { username: required(body.username)?, password: required(body.password)? };
    let session = state.auth_service().login(input).await.map_err(|e| {
        if matches!(e, AuthError::Unauthorized) {
            warn!("login_failed");
        }
        ApiError::from(e)
    })?;
    let user = session.user;
    info!(user_id = user.id, "login_succeeded");
    Ok(Json(LoginResponse {
        auth: true,
        token: session.token,
        data: SessionProfile {
            name: user.name,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        },
    }))
}

/// Verify the bearer token and attach its claims as `AuthContext`.
pub async fn require_auth(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(ApiError::MissingToken)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::InvalidToken)?;
    let claims = verify_token(token, &state.auth.jwt_secret).map_err(|e| {
        debug!(error = %e, "token rejected");
        ApiError::InvalidToken
    })?;
    req.extensions_mut().insert(AuthContext { user_id: claims.id, role: claims.role });
    Ok(next.run(req).await)
}
