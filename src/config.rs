use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub starttls: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub reset_token_ttl_minutes: i64,
    pub frontend_url: String,
    pub host: String,
    pub port: u16,
    /// `None` when `SMTP_HOST` is unset; outgoing mail is then only logged.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => {
                let name = var("DB_NAME")
                    .context("DATABASE_URL is not set and DB_NAME is missing")?;
                let user = var("DB_USER").unwrap_or_else(|| "postgres".into());
                let host = var("DB_HOST").unwrap_or_else(|| "localhost".into());
                let port = var("DB_PORT").unwrap_or_else(|| "5432".into());
                match var("DB_PASSWORD") {
                    Some(password) => {
                        format!("postgres://{user}:{password}@{host}:{port}/{name}")
                    }
                    None => format!("postgres://{user}@{host}:{port}/{name}"),
                }
            }
        };

        let jwt = JwtConfig {
            secret: var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| "frcomerce".into()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| "frcomerce-users".into()),
            ttl_days: parse_or(var("JWT_TTL_DAYS"), 7),
        };

        let smtp = match var("SMTP_HOST") {
            Some(host) => {
                let username = var("SMTP_USER");
                let from = var("SMTP_FROM")
                    .or_else(|| username.clone())
                    .context("SMTP_FROM or SMTP_USER must be set when SMTP_HOST is set")?;
                Some(SmtpConfig {
                    host,
                    port: parse_or(var("SMTP_PORT"), 587),
                    username,
                    password: var("SMTP_PASS"),
                    from,
                    starttls: parse_or(var("SMTP_STARTTLS"), true),
                })
            }
            None => None,
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(var("DB_MAX_CONNECTIONS"), 10),
            jwt,
            reset_token_ttl_minutes: parse_or(var("RESET_TOKEN_TTL_MINUTES"), 30),
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(var("APP_PORT").or_else(|| var("PORT")), 3000),
            smtp,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
