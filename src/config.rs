use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Where repositories keep their rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown STORAGE_BACKEND {other:?}"),
        }
    }
}

/// Credentials for the admin account created at startup, if configured.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub reset_token_ttl_minutes: i64,
    pub frontend_url: String,
    pub host: String,
    pub port: u16,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = match std::env::var("STORAGE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StorageBackend::Postgres,
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required when STORAGE_BACKEND=postgres");
        }

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "wordbook".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "wordbook-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60)?,
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14)?,
        };

        let admin_seed = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeed {
                email,
                password,
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
            }),
            _ => None,
        };

        Ok(Self {
            storage,
            database_url,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt,
            reset_token_ttl_minutes: env_parse("RESET_TOKEN_TTL_MINUTES", 60)?,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT", 8080)?,
            admin_seed,
        })
    }

    /// In-memory configuration with fixed JWT settings, for tests and local runs.
    pub fn for_memory(secret: &str) -> Self {
        Self {
            storage: StorageBackend::Memory,
            database_url: None,
            max_connections: 1,
            jwt: JwtConfig {
                secret: secret.into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            reset_token_ttl_minutes: 60,
            frontend_url: "http://localhost:3000".into(),
            host: "127.0.0.1".into(),
            port: 0,
            admin_seed: None,
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_or_default(key, std::env::var(key).ok(), default)
}

/// Unset falls back to `default`; a set but malformed value is an error.
fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid {key}={v:?}")),
    }
}
