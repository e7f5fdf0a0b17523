use std::sync::Arc;

use models::{user, Role};
use tracing::{info, instrument, warn};

use super::credentials::{hash_password, issue_token, verify_password, DUMMY_PASSWORD_HASH};
use super::domain::{AuthSession, LoginInput, RegisterInput, RegisteredUser};
use super::errors::AuthError;
use super::repository::AuthRepository;
use crate::users::NewUser;

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

fn required(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(())
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Self-registration; the new account always gets the `user` role.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_secs: 60 });
    /// let input = RegisterInput { name: "Test".into(), username: "test".into(), email: "user@example.com".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.role, models::Role::User);
    /// assert_eq!(user.result.last_insert_id, Some(1));
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<RegisteredUser, AuthError> {
        required("name", &input.name)?;
        required("password", &input.password)?;
        user::validate_username(&input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        user::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let password_hash = hash_password(&input.password)?;
        let result = self
            .repo
            .create_user(NewUser {
                name: input.name.clone(),
                username: input.username.clone(),
                email: input.email.clone(),
                password_hash,
                role: Role::User,
            })
            .await?;
        info!(user_id = ?result.last_insert_id, "user_registered");
        Ok(RegisteredUser {
            name: input.name,
            username: input.username,
            email: input.email,
            role: Role::User,
            result,
        })
    }

    /// Check credentials and issue a bearer token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_secs: 60 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), username: "u1".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "u1".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let Some(stored) = self.repo.find_by_username(&input.username).await? else {
            let _ = verify_password(&input.password, DUMMY_PASSWORD_HASH);
            warn!("login_unknown_user");
            return Err(AuthError::Unauthorized);
        };
        if !verify_password(&input.password, &stored.password_hash) {
            warn!(user_id = stored.user.id, "login_bad_password");
            return Err(AuthError::Unauthorized);
        }
        let token = issue_token(stored.user.id, stored.user.role, &self.cfg.jwt_secret, self.cfg.token_ttl_secs)?;
        info!(user_id = stored.user.id, role = %stored.user.role, "user_logged_in");
        Ok(AuthSession { user: stored.user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::verify_token;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: "k".into(), token_ttl_secs: 120 },
        )
    }

    fn input(username: &str) -> RegisterInput {
        RegisterInput {
            name: "Rina".into(),
            username: username.into(),
            email: format!("{username}@laundry.test"),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn login_token_carries_id_and_role() {
        let svc = svc();
        svc.register(input("rina")).await.unwrap();
        let session = svc.login(LoginInput { username: "rina".into(), password: "pw".into() }).await.unwrap();
        let claims = verify_token(&session.token, "k").unwrap();
        assert_eq!(claims.id, session.user.id);
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let svc = svc();
        svc.register(input("rina")).await.unwrap();
        let wrong = svc.login(LoginInput { username: "rina".into(), password: "nope".into() }).await;
        assert!(matches!(wrong, Err(AuthError::Unauthorized)));
        let unknown = svc.login(LoginInput { username: "ghost".into(), password: "pw".into() }).await;
        assert!(matches!(unknown, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn unknown_username_still_pays_for_a_hash() {
        let svc = svc();
        svc.register(input("rina")).await.unwrap();
        // warm up
        let _ = svc.login(LoginInput { username: "rina".into(), password: "nope".into() }).await;

        let started = std::time::Instant::now();
        let _ = svc.login(LoginInput { username: "rina".into(), password: "nope".into() }).await;
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        let _ = svc.login(LoginInput { username: "ghost".into(), password: "nope".into() }).await;
        let unknown_user = started.elapsed();

        assert!(
            unknown_user * 4 >= wrong_password,
            "unknown user took {unknown_user:?}, wrong password took {wrong_password:?}"
        );
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let svc = svc();
        let err = svc.register(RegisterInput { email: "no-at-sign".into(), ..input("rina") }).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = svc.register(RegisterInput { password: "".into(), ..input("rina") }).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(err.code(), 1001);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let svc = svc();
        svc.register(input("rina")).await.unwrap();
        let err = svc.register(input("rina")).await.unwrap_err();
        assert_eq!(err.to_string(), "rina is already registered, please use another username");
    }
}
