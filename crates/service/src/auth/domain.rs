use chrono::{DateTime, Utc};
use models::Role;
use serde::{Deserialize, Serialize};

use crate::write_result::WriteResult;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Stored user together with its password hash
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: AuthUser,
    pub password_hash: String,
}

/// Outcome of a successful registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub result: WriteResult,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

impl From<models::user::Model> for Credentials {
    fn from(u: models::user::Model) -> Self {
        Credentials {
            user: AuthUser {
                id: u.id,
                name: u.name,
                username: u.username,
                email: u.email,
                role: u.role,
                created_at: u.created_at,
            },
            password_hash: u.password,
        }
    }
}
