/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

// Development fallback only. Production startup fails if this is still in use.
const DEV_SECRET: &str = "bQeThWmZq4t7w!z$C&F)J@NcRfUjXn2r5u8x/A?D*G-KaPdSgVkYp3s6v9y$B&E)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_secret: String,
    pub token_ttl_seconds: u64,
    pub bearer_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = parse_port(std::env::var("PORT").ok().as_deref())?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_secret =
            std::env::var("AUTH_SECRET").unwrap_or_else(|_| DEV_SECRET.to_string());

        // A shared HMAC secret left at the built-in value makes every token forgeable.
        if app_env.is_production() && auth_secret == DEV_SECRET {
            return Err(ConfigError::Invalid("AUTH_SECRET"));
        }
        if auth_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_SECRET"));
        }

        let token_ttl_seconds = std::env::var("AUTH_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(7200); // 2 hours

        let bearer_prefix =
            std::env::var("AUTH_BEARER_PREFIX").unwrap_or_else(|_| "Bearer ".to_string());

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth_secret,
            token_ttl_seconds,
            bearer_prefix,
        })
    }
}

// A set-but-unparsable PORT is a misconfiguration, not a cue to fall back.
fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT")),
        None => Ok(3000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_only_when_unset() {
        assert_eq!(parse_port(None).unwrap(), 3000);
        assert_eq!(parse_port(Some("8080")).unwrap(), 8080);
    }

    #[test]
    fn unparsable_port_fails_startup() {
        assert!(matches!(
            parse_port(Some("eighty")),
            Err(ConfigError::Invalid("PORT"))
        ));
        assert!(matches!(
            parse_port(Some("70000")),
            Err(ConfigError::Invalid("PORT"))
        ));
    }
}
