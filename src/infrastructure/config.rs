use crate::domain::users::RoleId;
use crate::infrastructure::password::{MAX_COST, MIN_COST};
use anyhow::{Context, Result, bail};
use std::fmt;
use std::str::FromStr;

/// Token secrets and lifetimes.
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Seconds (default: 15 minutes).
    pub access_token_expiry: i64,
    /// Seconds (default: 30 days).
    pub refresh_token_expiry: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"[redacted]")
            .field("refresh_secret", &"[redacted]")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

/// Connection pool sizing and timeouts.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Server-side `statement_timeout` applied to every pooled connection.
    pub statement_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            acquire_timeout_secs: 3,
            idle_timeout_secs: 600,
            statement_timeout_secs: 3,
        }
    }
}

/// Runtime configuration, read once at boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub rotate_refresh_tokens: bool,
    pub require_activation: bool,
    pub admin_role_id: RoleId,
    /// Used to build links in outbound mail.
    pub public_base_url: String,
    /// Comma-separated; empty or `*` allows any origin.
    pub cors_allowed_origins: String,
    pub rate_limit_per_minute: u64,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
    pub db: DbConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `DATABASE_URL`              | required                |
    /// | `PORT`                      | `3000`                  |
    /// | `JWT_ACCESS_SECRET`         | required                |
    /// | `JWT_REFRESH_SECRET`        | required, must differ   |
    /// | `JWT_ACCESS_TOKEN_EXPIRY`   | `900`                   |
    /// | `JWT_REFRESH_TOKEN_EXPIRY`  | `2592000`               |
    /// | `ROTATE_REFRESH_TOKENS`     | `true`                  |
    /// | `REQUIRE_ACTIVATION`        | `false`                 |
    /// | `ADMIN_ROLE_ID`             | `1`                     |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:3000` |
    /// | `CORS_ALLOWED_ORIGINS`      | empty (any)             |
    /// | `RATE_LIMIT_PER_MINUTE`     | `60`                    |
    /// | `BCRYPT_COST`               | `12` (4..=31)           |
    /// | `DB_MAX_CONNECTIONS`        | `20`                    |
    /// | `DB_MIN_CONNECTIONS`        | `5`                     |
    /// | `DB_ACQUIRE_TIMEOUT_SECS`   | `3`                     |
    /// | `DB_IDLE_TIMEOUT_SECS`      | `600`                   |
    /// | `DB_STATEMENT_TIMEOUT_SECS` | `3`                     |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary key source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let jwt = JwtConfig {
            access_secret: env.required("JWT_ACCESS_SECRET")?,
            refresh_secret: env.required("JWT_REFRESH_SECRET")?,
            access_token_expiry: env.parse_or("JWT_ACCESS_TOKEN_EXPIRY", 900)?,
            refresh_token_expiry: env.parse_or("JWT_REFRESH_TOKEN_EXPIRY", 2_592_000)?,
        };
        if jwt.access_secret == jwt.refresh_secret {
            bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
        }
        if jwt.access_token_expiry <= 0 || jwt.refresh_token_expiry <= 0 {
            bail!("token expiries must be positive");
        }

        let defaults = DbConfig::default();
        let db = DbConfig {
            max_connections: env.parse_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env.parse_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout_secs: env
                .parse_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs)?,
            idle_timeout_secs: env.parse_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            statement_timeout_secs: env
                .parse_or("DB_STATEMENT_TIMEOUT_SECS", defaults.statement_timeout_secs)?,
        };

        let rate_limit_per_minute = env.parse_or("RATE_LIMIT_PER_MINUTE", 60u64)?;
        if rate_limit_per_minute == 0 {
            bail!("RATE_LIMIT_PER_MINUTE must be greater than zero");
        }

        let bcrypt_cost = env.parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between {} and {}", MIN_COST, MAX_COST);
        }

        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            port: env.parse_or("PORT", 3000)?,
            jwt,
            rotate_refresh_tokens: env.parse_or("ROTATE_REFRESH_TOKENS", true)?,
            require_activation: env.parse_or("REQUIRE_ACTIVATION", false)?,
            admin_role_id: env.parse_or("ADMIN_ROLE_ID", 1)?,
            public_base_url: env
                .get("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            cors_allowed_origins: env.get("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            rate_limit_per_minute,
            bcrypt_cost,
            db,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .with_context(|| format!("{} must be set", key))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("{} is invalid ({}): {}", key, raw, e)),
            None => Ok(default),
        }
    }
}
