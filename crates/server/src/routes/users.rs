use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use models::{user, Role};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use service::auth::credentials::hash_password;
use service::users::{self, UserChanges};
use service::ServiceError;

use crate::envelope::{Envelope, Mutation};
use crate::errors::ApiError;
use crate::extract::{required, ApiJson, ApiPath};
use crate::policy::AuthContext;
use crate::routes::{auth::ServerState, ensure_changed, reject_reference};

const NO_AUTHORITY_RESOURCE: &str = "You don't have authority over that resource";
const NO_AUTHORITY_METHOD: &str = "You don't have authority over that method";
const OWNER_SELF_DELETE: &str = "You are the owner, if you delete your own account who becomes the owner?";
const INVALID_ROLE: &str = "invalid role, role must admin or user";

/// Public projection of an account; never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self { id: u.id, name: u.name, username: u.username, email: u.email, role: u.role, created_at: u.created_at }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OwnerUpdateRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `user` or `admin`; omitted keeps the current role.
    pub role: Option<String>,
}

fn changes_from(
    name: Option<String>,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<UserChanges, ApiError> {
    let (name, username, email, password) = (required(name)?, required(username)?, required(email)?, required(password)?);
    let password_hash = hash_password(&password)?;
    Ok(UserChanges { name, username, email, password_hash })
}

fn on_conflict(username: &str) -> impl FnOnce(ServiceError) -> ApiError {
    let username = username.to_string();
    move |err| match err {
        ServiceError::Conflict(_) => ApiError::Conflict(username),
        other => other.into(),
    }
}

async fn load_user(state: &ServerState, id: i32) -> Result<user::Model, ApiError> {
    users::get_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

#[utoipa::path(get, path = "/api/v1/profile", tag = "users", security(("bearer" = [])), responses((status = 200, description = "Own profile"), (status = 404, description = "User not found")))]
pub async fn get_profile(
    State(state): State<ServerState>,
    ctx: AuthContext,
) -> Result<Json<Envelope<UserView>>, ApiError> {
    let found = load_user(&state, ctx.user_id).await?;
    Ok(Envelope::ok(found.into()))
}

#[utoipa::path(put, path = "/api/v1/profile", tag = "users", security(("bearer" = [])), request_body = ProfileUpdateRequest, responses((status = 201, description = "Updated"), (status = 400, description = "Invalid body, username taken or account gone")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    ctx: AuthContext,
    ApiJson(body): ApiJson<ProfileUpdateRequest>,
) -> Result<(StatusCode, Json<Mutation<UserView>>), ApiError> {
    let changes = changes_from(body.name, body.username, body.email, body.password)?;
    let result = users::update_profile(&state.db, ctx.user_id, &changes)
        .await
        .map_err(on_conflict(&changes.username))?;
    let result = ensure_changed(result, "updated", "User")?;
    let updated = load_user(&state, ctx.user_id).await?;
    info!(user_id = ctx.user_id, "profile_updated");
    Ok(Mutation::created("User updated successfully", result, updated.into()))
}

#[utoipa::path(get, path = "/api/v1/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")), responses((status = 200, description = "User"), (status = 403, description = "Owner record requested by non-owner"), (status = 404, description = "User not found")))]
pub async fn get_user(
    State(state): State<ServerState>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<UserView>>, ApiError> {
    if id == user::OWNER_ID && ctx.role != Role::Owner {
        return Err(ApiError::Forbidden(NO_AUTHORITY_RESOURCE.into()));
    }
    let found = load_user(&state, id).await?;
    Ok(Envelope::ok(found.into()))
}

#[utoipa::path(get, path = "/api/v1/admin/users", tag = "users", security(("bearer" = [])), responses((status = 200, description = "All accounts except the owner")))]
pub async fn list_users(State(state): State<ServerState>) -> Result<Json<Envelope<Vec<UserView>>>, ApiError> {
    let all = users::list_users(&state.db).await?;
    Ok(Envelope::ok(all.into_iter().map(UserView::from).collect()))
}

#[utoipa::path(delete, path = "/api/v1/admin/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")), responses((status = 200, description = "Deleted"), (status = 400, description = "Owner record or unknown id")))]
pub async fn delete_user(
    State(state): State<ServerState>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<i32>,
) -> Result<(StatusCode, Json<Mutation<()>>), ApiError> {
    if id == user::OWNER_ID || (ctx.role == Role::Owner && id == ctx.user_id) {
        let msg = if ctx.role == Role::Owner { OWNER_SELF_DELETE } else { NO_AUTHORITY_METHOD };
        return Err(ApiError::Refused(msg.into()));
    }
    let result = users::delete_user(&state.db, id).await.map_err(reject_reference("User"))?;
    let result = ensure_changed(result, "deleted", "User")?;
    info!(user_id = id, deleted_by = ctx.user_id, "user_deleted");
    Ok(Mutation::deleted("User deleted successfully", result))
}

#[utoipa::path(put, path = "/api/v1/owner/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")), request_body = OwnerUpdateRequest, responses((status = 201, description = "Updated"), (status = 400, description = "Invalid body or role"), (status = 403, description = "Owner record edited by another account")))]
pub async fn owner_update_user(
    State(state): State<ServerState>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<OwnerUpdateRequest>,
) -> Result<(StatusCode, Json<Mutation<UserView>>), ApiError> {
    let target_is_owner = id == user::OWNER_ID;
    if target_is_owner && !ctx.is_owner_account() {
        return Err(ApiError::Forbidden(NO_AUTHORITY_RESOURCE.into()));
    }
    let role = match body.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => None,
        Some(raw) => {
            let role: Role = raw.parse().map_err(|_| ApiError::BadRequest(INVALID_ROLE.into()))?;
            // only id 1 holds the owner role, and it keeps it
            if (role == Role::Owner) != target_is_owner {
                return Err(ApiError::BadRequest(INVALID_ROLE.into()));
            }
            Some(role)
        }
    };
    let changes = changes_from(body.name, body.username, body.email, body.password)?;
    let result = users::owner_update_user(&state.db, id, &changes, role)
        .await
        .map_err(on_conflict(&changes.username))?;
    let result = ensure_changed(result, "updated", "User")?;
    let updated = load_user(&state, id).await?;
    info!(user_id = id, role = %updated.role, "user_updated_by_owner");
    Ok(Mutation::created("User updated successfully", result, updated.into()))
}
