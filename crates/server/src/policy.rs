//! Role policy: which authenticated roles may reach which route group.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use models::{user::OWNER_ID, Role};
use tracing::debug;

use crate::errors::ApiError;

/// Identity attached by `require_auth` from verified token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i32,
    pub role: Role,
}

impl AuthContext {
    pub fn is_owner_account(&self) -> bool {
        self.user_id == OWNER_ID
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthContext>().copied().ok_or(ApiError::MissingToken)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any verified token.
    Authenticated,
    /// Admin or owner.
    Staff,
    Owner,
}

impl Access {
    /// Lowest role the group admits.
    pub fn min_role(self) -> Role {
        match self {
            Access::Authenticated => Role::User,
            Access::Staff => Role::Admin,
            Access::Owner => Role::Owner,
        }
    }

    pub fn allows(self, role: Role) -> bool {
        role >= self.min_role()
    }

    fn denial(self) -> &'static str {
        match self {
            Access::Owner => "Require owner role",
            Access::Staff | Access::Authenticated => "Require owner or admin role",
        }
    }
}

/// Route guard; must run inside `require_auth`.
pub async fn require_access(State(access): State<Access>, req: Request, next: Next) -> Result<Response, ApiError> {
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or(ApiError::MissingToken)?;
    if !access.allows(ctx.role) {
        debug!(user_id = ctx.user_id, role = %ctx.role, ?access, "access denied");
        return Err(ApiError::Forbidden(access.denial().to_string()));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table() {
        let cases = [
            (Access::Authenticated, Role::User, true),
            (Access::Authenticated, Role::Owner, true),
            (Access::Staff, Role::User, false),
            (Access::Staff, Role::Admin, true),
            (Access::Staff, Role::Owner, true),
            (Access::Owner, Role::User, false),
            (Access::Owner, Role::Admin, false),
            (Access::Owner, Role::Owner, true),
        ];
        for (access, role, allowed) in cases {
            assert_eq!(access.allows(role), allowed, "{access:?} / {role}");
        }
    }

    #[test]
    fn denial_messages() {
        assert_eq!(Access::Owner.denial(), "Require owner role");
        assert_eq!(Access::Staff.denial(), "Require owner or admin role");
    }

    #[test]
    fn staff_starts_at_admin() {
        assert_eq!(Access::Authenticated.min_role(), Role::User);
        assert_eq!(Access::Staff.min_role(), Role::Admin);
        assert_eq!(Access::Owner.min_role(), Role::Owner);
    }
}
