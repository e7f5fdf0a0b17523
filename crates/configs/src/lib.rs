use std::{collections::HashMap, env, path::Path};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_JWT_SECRET: &str = "secret";
pub const DEFAULT_OWNER_PASSWORD: &str = "owner";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
    /// Allowed CORS origin; `*` allows any.
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            worker_threads: Some(4),
            cors_origin: "*".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    pub path: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./dlsmlaundry.db".into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            acquire_timeout_secs: 30,
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub owner_name: String,
    pub owner_username: String,
    pub owner_email: String,
    pub owner_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.into(),
            token_ttl_secs: 86_400,
            owner_name: "Owner".into(),
            owner_username: "owner".into(),
            owner_email: "owner@laundry.local".into(),
            owner_password: DEFAULT_OWNER_PASSWORD.into(),
        }
    }
}

/// Load `config.toml` (or `CONFIG_PATH`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let cfg: AppConfig = toml::from_str(&content).with_context(|| format!("parsing {path}"))?;
    Ok(cfg)
}

impl AppConfig {
    /// `.env` → config file → environment overrides → validation.
    pub fn load_and_validate() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut cfg = load_default()?;
        cfg.apply_overrides(|key| env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply overrides from any key/value source (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = Some(parse_var("TOKIO_WORKER_THREADS", &threads)?);
        }
        if let Some(origin) = lookup("ORIGIN") {
            self.server.cors_origin = origin;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_SECS") {
            self.auth.token_ttl_secs = parse_var("TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(v) = lookup("OWNER_USERNAME") {
            self.auth.owner_username = v;
        }
        if let Some(v) = lookup("OWNER_EMAIL") {
            self.auth.owner_email = v;
        }
        if let Some(v) = lookup("OWNER_PASSWORD") {
            self.auth.owner_password = v;
        }
        Ok(())
    }

    /// Convenience for tests: overrides from a fixed map.
    pub fn with_overrides(mut self, vars: &HashMap<&str, &str>) -> Result<Self> {
        self.apply_overrides(|k| vars.get(k).map(|v| v.to_string()))?;
        Ok(self)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| anyhow!("{key} has an invalid value: {raw:?}"))
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads.map_or(true, |w| w == 0) {
            self.worker_threads = Some(4);
        }
        if self.cors_origin.trim().is_empty() {
            self.cors_origin = "*".to_string();
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// In-memory database (tests, throwaway runs).
    pub fn in_memory() -> Self {
        Self { path: ":memory:".into(), ..Self::default() }
    }

    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// sqlx connection URL; file databases are created on first open.
    pub fn url(&self) -> String {
        if self.is_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", self.path)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("database.path is empty; set it in config.toml or DATABASE_PATH"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn uses_default_owner_password(&self) -> bool {
        self.owner_password == DEFAULT_OWNER_PASSWORD
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(anyhow!("auth.jwt_secret must not be empty"));
        }
        if self.token_ttl_secs == 0 {
            return Err(anyhow!("auth.token_ttl_secs must be positive"));
        }
        if self.owner_username.trim().is_empty()
            || self.owner_email.trim().is_empty()
            || self.owner_password.is_empty()
        {
            return Err(anyhow!("owner account settings must not be empty"));
        }
        Ok(())
    }
}
