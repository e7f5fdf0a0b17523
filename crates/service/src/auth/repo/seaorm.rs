use sea_orm::DatabaseConnection;

use crate::auth::domain::Credentials;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::errors::ServiceError;
use crate::users::{self, NewUser};
use crate::write_result::WriteResult;

#[derive(Clone)]
pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
        let found = users::find_user_by_username(&self.db, username)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(Credentials::from))
    }

    async fn create_user(&self, new: NewUser) -> Result<WriteResult, AuthError> {
        let username = new.username.clone();
        users::add_user(&self.db, new).await.map_err(|e| match e {
            ServiceError::Conflict(_) => AuthError::Conflict(username),
            ServiceError::Model(m) => AuthError::Validation(m.to_string()),
            other => AuthError::Repository(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{LoginInput, RegisterInput};
    use crate::auth::service::{AuthConfig, AuthService};
    use crate::test_support::get_db;
    use std::sync::Arc;

    #[tokio::test]
    async fn register_and_login_against_sqlite() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let svc = AuthService::new(
            Arc::new(SeaOrmAuthRepository::new(db.clone())),
            AuthConfig { jwt_secret: "secret".into(), token_ttl_secs: 60 },
        );
        let input = RegisterInput {
            name: "Dewi".into(),
            username: "dewi".into(),
            email: "dewi@laundry.test".into(),
            password: "pw123456".into(),
        };
        let registered = svc.register(input.clone()).await?;
        assert_eq!(registered.result.rows_affected, 1);

        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(ref u) if u == "dewi"), "{err:?}");

        let session = svc.login(LoginInput { username: "dewi".into(), password: "pw123456".into() }).await?;
        assert_eq!(session.user.email, "dewi@laundry.test");
        let stored = users::find_user_by_username(&db, "dewi").await?.unwrap();
        assert_ne!(stored.password, "pw123456");
        Ok(())
    }
}
