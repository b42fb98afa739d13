/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, APP_ENV, OAuth 接続先など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

const DEFAULT_OAUTH_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_OAUTH_TIMEOUT_MS: u64 = 200;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
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
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Connection settings for the token introspection service.
///
/// Fixed at construction time; the call sits on the critical path of every
/// authenticated request, so the timeout stays short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl OauthConfig {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    fn from_raw(base_url: Option<&str>, timeout_ms: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.unwrap_or(DEFAULT_OAUTH_BASE_URL))
            .map_err(|_| ConfigError::Invalid("OAUTH_BASE_URL"))?;

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid("OAUTH_BASE_URL"));
        }

        let timeout_ms = match timeout_ms {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::Invalid("OAUTH_TIMEOUT_MS"))?,
            None => DEFAULT_OAUTH_TIMEOUT_MS,
        };

        Ok(Self::new(base_url, Duration::from_millis(timeout_ms)))
    }
}

impl Default for OauthConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_OAUTH_BASE_URL).expect("default oauth base url is valid"),
            timeout: Duration::from_millis(DEFAULT_OAUTH_TIMEOUT_MS),
        }
    }
}

/// Limits for the HTTP layer in front of every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl HttpConfig {
    /// The request timeout must leave room for the introspection call, so a
    /// slow token service ends as a 500 from the auth layer, not a 408.
    fn from_raw(
        request_timeout_secs: Option<&str>,
        body_limit_bytes: Option<&str>,
        oauth: &OauthConfig,
    ) -> Result<Self, ConfigError> {
        let request_timeout = match request_timeout_secs {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        if request_timeout <= oauth.timeout {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"));
        }

        let body_limit_bytes = match body_limit_bytes {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("BODY_LIMIT_BYTES"))?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        Ok(Self {
            request_timeout,
            body_limit_bytes,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub oauth: OauthConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let oauth = OauthConfig::from_raw(
            std::env::var("OAUTH_BASE_URL").ok().as_deref(),
            std::env::var("OAUTH_TIMEOUT_MS").ok().as_deref(),
        )?;

        let http = HttpConfig::from_raw(
            std::env::var("REQUEST_TIMEOUT_SECS").ok().as_deref(),
            std::env::var("BODY_LIMIT_BYTES").ok().as_deref(),
            &oauth,
        )?;

        Ok(Self {
            addr,
            app_env,
            oauth,
            http,
        })
    }
}
