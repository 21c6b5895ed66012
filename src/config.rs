use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub public_rps: u32,
    pub api_rps: u32,
    /// Key rate limits on the first `X-Forwarded-For` hop. Only safe behind a
    /// proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    pub log_format: LogFormat,
    pub bootstrap_superadmin: Option<BootstrapAccount>,
}

#[derive(Debug, Clone)]
pub struct BootstrapAccount {
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let storage_backend = match env::var("STORAGE_BACKEND").ok().as_deref() {
            Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for STORAGE_BACKEND: {}",
                    other
                )))
            }
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "Missing environment variable: DATABASE_URL".to_string(),
            ));
        }

        let log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let bootstrap_superadmin = match (
            env::var("BOOTSTRAP_SUPERADMIN_EMAIL").ok(),
            env::var("BOOTSTRAP_SUPERADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAccount { email, password }),
            _ => None,
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8080"),
            storage_backend,
            database_url,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_ttl_hours: get_env_parse_or("JWT_TTL_HOURS", 12)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 10)?,
            api_rps: get_env_parse_or("API_RPS", 100)?,
            trust_forwarded_for: get_env_parse_or("TRUST_FORWARDED_FOR", false)?,
            log_format,
            bootstrap_superadmin,
        })
    }

    /// Memory-backed configuration with a fixed secret, for tests and local runs.
    pub fn for_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            server_address: "127.0.0.1:0".to_string(),
            storage_backend: StorageBackend::Memory,
            database_url: None,
            database_max_connections: 1,
            jwt_secret: jwt_secret.into(),
            jwt_ttl_hours: 12,
            public_rps: 1000,
            api_rps: 1000,
            trust_forwarded_for: false,
            log_format: LogFormat::Pretty,
            bootstrap_superadmin: None,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
