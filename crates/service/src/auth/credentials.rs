//! Password hashing and bearer tokens.
//!
//! New hashes are Argon2id PHC strings. Hashes starting with `$2` come from
//! the bcrypt era and are still accepted on login.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation};
use models::Role;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::errors::AuthError;

pub const HASH_MEMORY_KIB: u32 = 19_456;
pub const HASH_ITERATIONS: u32 = 2;
pub const HASH_LANES: u32 = 1;

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Argon2id hash at the cost above that no password matches. Unknown
/// usernames are checked against it so every failed login costs one hash.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$bGF1bmRyeS1kdW1teS0xNg$Z+EJgx7ZtKwTGOJ8FlmodJ+2iiT/1+JGvxHN7OFYduQ";

/// Token payload. `id` and `role` are trusted as-is until `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("malformed token: {0}")]
    Malformed(String),
}

fn hasher() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(HASH_MEMORY_KIB, HASH_ITERATIONS, HASH_LANES, None)
        .map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Salted one-way hash of `password`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Constant-time check of `password` against a stored hash. Unparseable
/// hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if hash.starts_with("$2") {
        return bcrypt::verify(password, hash).unwrap_or(false);
    }
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    // cost parameters are read from the PHC string
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Sign an HS256 token for `id`/`role` valid for `ttl_secs`.
///
/// # Examples
/// ```
/// use models::Role;
/// use service::auth::credentials::{issue_token, verify_token};
/// let token = issue_token(7, Role::Admin, "secret", 60).unwrap();
/// let claims = verify_token(&token, "secret").unwrap();
/// assert_eq!((claims.id, claims.role), (7, Role::Admin));
/// ```
pub fn issue_token(id: i32, role: Role, secret: &str, ttl_secs: u64) -> Result<String, AuthError> {
    let iat = get_current_timestamp();
    let claims = Claims { id, role, iat, exp: iat.saturating_add(ttl_secs) };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::Invalid,
            _ => TokenError::Malformed(e.to_string()),
        })
}
