use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown STORE_BACKEND '{other}' (expected redis or memory)"),
        }
    }
}

/// Outbound mail settings. No `smtp_host` means mail is only logged.
#[derive(Clone, Debug, Default)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from: String,
    pub admin_email: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub log_dir: String,

    pub api_prefix: String,
    pub json_limit_bytes: usize,
    /// 0 disables rate limiting
    pub rate_api_per_min: u32,

    /// Base for approve/deny links sent to the admin
    pub public_base_url: String,
    pub mail: MailConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let smtp_username = optional("SMTP_USERNAME");
        let from = optional("MAIL_FROM")
            .or_else(|| smtp_username.clone())
            .unwrap_or_else(|| "noreply@localhost".to_string());

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "0.0.0.0:3000"),
            store_backend: parse_or("STORE_BACKEND", StoreBackend::Redis)?,
            redis_url: var_or("REDIS_URL", "redis://127.0.0.1:6379"),
            log_dir: var_or("LOG_DIR", "logs"),

            api_prefix: var_or("API_PREFIX", "").trim_end_matches('/').to_string(),
            json_limit_bytes: parse_or("JSON_LIMIT_BYTES", 5 * 1024 * 1024)?, // 5mb
            rate_api_per_min: parse_or("RATE_API_PER_MIN", 600)?,

            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            mail: MailConfig {
                smtp_host: optional("SMTP_HOST"),
                smtp_port: parse_or("SMTP_PORT", 587)?,
                smtp_username,
                smtp_password: optional("SMTP_PASSWORD"),
                from,
                admin_email: optional("ADMIN_EMAIL"),
            },
        })
    }

    /// Absolute URL for a route, including the API prefix.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}{}", self.public_base_url, self.api_prefix, path)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has invalid value '{raw}'")),
        None => Ok(default),
    }
}
