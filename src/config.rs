/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Clerk 設定、transcription worker など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ組み立て、以降は immutable な値として参照で渡す
 */
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    /// Auto-migration is gated on an explicit `development` value, so anything
    /// else (including an unset variable) is treated as production.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("development") | Some("dev") => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Debug, PartialEq, Eq)]
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

/// Identity provider (Clerk) settings.
///
/// The secret key is injected once here and handed to the verifier at startup.
#[derive(Clone)]
pub struct ClerkConfig {
    pub secret_key: String,
    pub jwt_key_pem: Option<String>,
    pub api_url: Url,
    pub authorized_parties: Vec<String>,
    pub leeway_seconds: u64,
    pub session_cookie_name: String,
}

impl fmt::Debug for ClerkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("ClerkConfig")
            .field("api_url", &self.api_url.as_str())
            .field("jwt_key_pem", &self.jwt_key_pem.is_some())
            .field("authorized_parties", &self.authorized_parties)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("session_cookie_name", &self.session_cookie_name)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DbPoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub db_pool: DbPoolConfig,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub clerk: ClerkConfig,

    // Unset is allowed: transcription requests then fail fast per request.
    pub transcription_base_url: Option<String>,

    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (env, map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(get("PORT"), 8000, "PORT")?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = get("DATABASE_URL")
            .or_else(|| get("POSTGRES_URL"))
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let db_pool = DbPoolConfig {
            max_connections: parse_or(get("DB_MAX_CONNECTIONS"), 100, "DB_MAX_CONNECTIONS")?,
            min_connections: parse_or(get("DB_MIN_CONNECTIONS"), 10, "DB_MIN_CONNECTIONS")?,
            max_lifetime: Duration::from_secs(parse_or(
                get("DB_MAX_LIFETIME_SECONDS"),
                3600,
                "DB_MAX_LIFETIME_SECONDS",
            )?),
        };
        if db_pool.min_connections > db_pool.max_connections {
            return Err(ConfigError::Invalid("DB_MIN_CONNECTIONS"));
        }

        let app_env = AppEnv::parse(get("APP_ENV").or_else(|| get("ENV")).as_deref());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let secret_key = get("CLERK_SECRET_KEY").ok_or(ConfigError::Missing("CLERK_SECRET_KEY"))?;

        let api_url = Url::parse(
            &get("CLERK_API_URL").unwrap_or_else(|| "https://api.clerk.com".to_string()),
        )
        .map_err(|_| ConfigError::Invalid("CLERK_API_URL"))?;

        let clerk = ClerkConfig {
            secret_key,
            jwt_key_pem: get("CLERK_JWT_KEY").map(|pem| pem.replace("\\n", "\n")),
            api_url,
            authorized_parties: get("CLERK_AUTHORIZED_PARTIES")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            leeway_seconds: parse_or(get("CLERK_LEEWAY_SECONDS"), 5, "CLERK_LEEWAY_SECONDS")?,
            session_cookie_name: get("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| "__session".to_string()),
        };

        let transcription_base_url = match get("INTERNAL_LOCAL_DOCKER_URL_BASE_PATH") {
            Some(raw) => {
                Url::parse(&raw)
                    .map_err(|_| ConfigError::Invalid("INTERNAL_LOCAL_DOCKER_URL_BASE_PATH"))?;
                Some(raw.trim_end_matches('/').to_string())
            }
            None => None,
        };

        let max_upload_bytes = parse_or(get("MAX_UPLOAD_BYTES"), 25 * 1024 * 1024, "MAX_UPLOAD_BYTES")?;

        let request_timeout = Duration::from_secs(parse_or(
            get("REQUEST_TIMEOUT_SECONDS"),
            300,
            "REQUEST_TIMEOUT_SECONDS",
        )?);

        Ok(Self {
            addr,
            database_url,
            db_pool,
            app_env,
            cors_allowed_origins,
            clerk,
            transcription_base_url,
            max_upload_bytes,
            request_timeout,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    default: T,
    key: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/voicescribe"),
        ("CLERK_SECRET_KEY", "sk_test_123"),
    ];

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.app_env, AppEnv::Production);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.clerk.session_cookie_name, "__session");
        assert_eq!(config.clerk.api_url.as_str(), "https://api.clerk.com/");
        assert!(config.transcription_base_url.is_none());
        assert_eq!(config.db_pool.max_connections, 100);
        assert_eq!(config.db_pool.min_connections, 10);
        assert_eq!(config.db_pool.max_lifetime, Duration::from_secs(3600));
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let err = Config::from_lookup(lookup(&[("CLERK_SECRET_KEY", "sk")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn postgres_url_is_accepted_as_fallback() {
        let config = Config::from_lookup(lookup(&[
            ("POSTGRES_URL", "postgres://db/notes"),
            ("CLERK_SECRET_KEY", "sk"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres://db/notes");
    }

    #[test]
    fn missing_clerk_secret_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("CLERK_SECRET_KEY"));
    }

    #[test]
    fn development_requires_an_explicit_flag() {
        assert_eq!(AppEnv::parse(None), AppEnv::Production);
        assert_eq!(AppEnv::parse(Some("staging")), AppEnv::Production);
        assert_eq!(AppEnv::parse(Some("Development")), AppEnv::Development);

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ENV", "development"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.app_env.is_development());
    }

    #[test]
    fn transcription_base_url_is_validated_and_trimmed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("INTERNAL_LOCAL_DOCKER_URL_BASE_PATH", "http://ml:8001/"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.transcription_base_url.as_deref(), Some("http://ml:8001"));

        let mut bad = REQUIRED.to_vec();
        bad.push(("INTERNAL_LOCAL_DOCKER_URL_BASE_PATH", "not a url"));
        let err = Config::from_lookup(lookup(&bad)).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("INTERNAL_LOCAL_DOCKER_URL_BASE_PATH"));
    }

    #[test]
    fn malformed_numbers_are_invalid() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAX_UPLOAD_BYTES", "lots"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("MAX_UPLOAD_BYTES"));
    }

    #[test]
    fn clerk_lists_and_escaped_pem_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("CLERK_AUTHORIZED_PARTIES", "http://localhost:3000, https://app.example"));
        pairs.push(("CLERK_JWT_KEY", "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(
            config.clerk.authorized_parties,
            vec!["http://localhost:3000", "https://app.example"]
        );
        assert_eq!(
            config.clerk.jwt_key_pem.as_deref(),
            Some("-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----")
        );
    }
}
