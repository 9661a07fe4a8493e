use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "offramp.toml",
    "config/offramp.toml",
    "crates/config/offramp.toml",
    "../offramp.toml",
    "../config/offramp.toml",
    "backend/offramp.toml",
    "backend/config/offramp.toml",
];

/// Seven days, the lifetime of a login session cookie.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24 * 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cron: CronConfig,
    pub storage: StorageConfig,
    pub openrouter: OpenRouterConfig,
    pub veganswap: VeganSwapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://offramp.db".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens. Auth routes answer 500 while unset.
    pub secret: Option<String>,
    pub session_ttl_seconds: u64,
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            secure_cookies: false,
        }
    }
}

/// Shared secret expected in the `x-cron-secret` header of the reminder trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CronConfig {
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("media"),
            public_base_url: "/media".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Settings for the OpenRouter chat-completions API.
///
/// ```
/// use offramp_config::OpenRouterConfig;
///
/// let provider = OpenRouterConfig::default();
/// assert_eq!(provider.base_url, "https://openrouter.ai/api/v1");
/// assert_eq!(provider.request_timeout_seconds, 30);
/// assert!(provider.api_key.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub suggest_model: String,
    pub cost_model: String,
    /// Model behind the streaming dish assistant.
    pub chat_model: String,
    pub request_timeout_seconds: u64,
    pub referer: Option<String>,
    pub title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            suggest_model: "anthropic/claude-3.5-sonnet".to_string(),
            cost_model: "openai/gpt-4o-mini".to_string(),
            chat_model: "openai/gpt-4o-mini".to_string(),
            request_timeout_seconds: 30,
            referer: Some("http://localhost:3000".to_string()),
            title: Some("Plant-Based Swap Guide".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VeganSwapConfig {
    pub base_url: Option<String>,
    pub request_timeout_seconds: u64,
}

impl Default for VeganSwapConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_seconds: 15,
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use offramp_config::load;
///
/// std::env::remove_var("OFFRAMP_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let session_ttl = i64::try_from(defaults.auth.session_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.session_ttl_seconds", session_ttl)?
        .set_default("openrouter.base_url", defaults.openrouter.base_url.clone())?;

    let environment_overrides = config::Environment::with_prefix("OFFRAMP").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("OFFRAMP_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via OFFRAMP_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.session_ttl_seconds > i64::MAX as u64 {
        config.auth.session_ttl_seconds = i64::MAX as u64;
    }

    // Empty strings from the environment mean "unset".
    config.auth.secret = config.auth.secret.filter(|secret| !secret.trim().is_empty());
    config.cron.secret = config.cron.secret.filter(|secret| !secret.trim().is_empty());
    config.openrouter.api_key = config.openrouter.api_key.filter(|key| !key.trim().is_empty());
    config.veganswap.base_url = config.veganswap.base_url.filter(|url| !url.trim().is_empty());

    debug!(
        address = %config.http.address,
        port = config.http.port,
        database = %config.database.url,
        auth_configured = config.auth.secret.is_some(),
        openrouter_configured = config.openrouter.api_key.is_some(),
        "loaded backend configuration"
    );
    Ok(config)
}
