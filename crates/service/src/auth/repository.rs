use async_trait::async_trait;

use super::domain::Credentials;
use super::errors::AuthError;
use crate::users::NewUser;
use crate::write_result::WriteResult;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credentials>, AuthError>;
    /// Fails with `AuthError::Conflict` when the username or email is taken.
    async fn create_user(&self, new: NewUser) -> Result<WriteResult, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use crate::auth::domain::AuthUser;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<Vec<Credentials>>,
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_username(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
            let users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            Ok(users.iter().find(|c| c.user.username == username).cloned())
        }

        async fn create_user(&self, new: NewUser) -> Result<WriteResult, AuthError> {
            let mut users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            if users.iter().any(|c| c.user.username == new.username || c.user.email == new.email) {
                return Err(AuthError::Conflict(new.username));
            }
            let id = users.len() as i32 + 1;
            users.push(Credentials {
                user: AuthUser {
                    id,
                    name: new.name,
                    username: new.username,
                    email: new.email,
                    role: new.role,
                    created_at: chrono::Utc::now(),
                },
                password_hash: new.password_hash,
            });
            Ok(WriteResult::inserted(id))
        }
    }
}
