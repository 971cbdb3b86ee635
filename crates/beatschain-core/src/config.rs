//! Configuration module
//!
//! Provider endpoints, credentials and limits are read once into an explicit
//! [`Config`] that is passed to the orchestrator and the clients at construction.
//! Nothing downstream reads the process environment.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::constants::{DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_MAX_UPLOAD_BYTES};
use crate::provider_types::StorageProvider;

const STORAGE_TIMEOUT_SECS: u64 = 120;
const TRANSCODE_TIMEOUT_SECS: u64 = 30;
const MINT_TIMEOUT_SECS: u64 = 60;
const ATTRIBUTION_TIMEOUT_SECS: u64 = 10;
const HEALTH_CHECK_INTERVAL_SECS: u64 = 300;
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;
const UPLOAD_REVENUE_AMOUNT: f64 = 1.25;

/// A credential that never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for SecretString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("[REDACTED]")
    }
}

/// File validator limits
#[derive(Clone, Debug)]
pub struct ValidationConfig {
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Content storage provider configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    /// Pinata API base URL
    pub endpoint: String,
    /// Gateway used to build retrieval URLs for pinned content
    pub gateway_url: String,
    pub pinata_jwt: Option<SecretString>,
    pub pinata_api_key: Option<SecretString>,
    pub pinata_secret_key: Option<SecretString>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::Pinata,
            endpoint: "https://api.pinata.cloud".to_string(),
            gateway_url: "https://gateway.pinata.cloud".to_string(),
            pinata_jwt: None,
            pinata_api_key: None,
            pinata_secret_key: None,
            local_storage_path: None,
            local_storage_base_url: None,
            timeout_seconds: STORAGE_TIMEOUT_SECS,
        }
    }
}

impl StorageConfig {
    pub fn has_pinata_credentials(&self) -> bool {
        self.pinata_jwt.is_some()
            || (self.pinata_api_key.is_some() && self.pinata_secret_key.is_some())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Streaming/transcoding provider configuration
#[derive(Clone, Debug)]
pub struct TranscodeConfig {
    /// When false the transcoding stage records a placeholder without a network call
    pub enabled: bool,
    pub endpoint: String,
    pub api_key: Option<SecretString>,
    /// Base URL of the playback page; the playback id is appended as a path segment
    pub playback_base_url: String,
    pub timeout_seconds: u64,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://livepeer.studio/api".to_string(),
            api_key: None,
            playback_base_url: "https://lvpr.tv".to_string(),
            timeout_seconds: TRANSCODE_TIMEOUT_SECS,
        }
    }
}

impl TranscodeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Minting backend configuration
#[derive(Clone, Debug)]
pub struct MintConfig {
    pub endpoint: String,
    pub api_key: Option<SecretString>,
    /// Network recorded when the backend does not report one
    pub network: String,
    pub timeout_seconds: u64,
}

impl MintConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            network: "solana-devnet".to_string(),
            timeout_seconds: MINT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Campaign webhook and revenue tracking configuration
#[derive(Clone, Debug)]
pub struct AttributionConfig {
    /// Campaign event webhook; notification is skipped when unset
    pub webhook_url: Option<String>,
    /// Base URL of the revenue/analytics API; tracking is skipped when unset
    pub endpoint: Option<String>,
    /// HMAC-SHA256 key used to sign outgoing payloads
    pub signing_secret: Option<SecretString>,
    pub platform: String,
    pub upload_revenue_amount: f64,
    pub timeout_seconds: u64,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            endpoint: None,
            signing_secret: None,
            platform: "beatschain".to_string(),
            upload_revenue_amount: UPLOAD_REVENUE_AMOUNT,
            timeout_seconds: ATTRIBUTION_TIMEOUT_SECS,
        }
    }
}

impl AttributionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Scheduled health-check configuration
#[derive(Clone, Debug)]
pub struct HealthCheckConfig {
    pub targets: Vec<String>,
    pub interval_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            interval_seconds: HEALTH_CHECK_INTERVAL_SECS,
            timeout_seconds: HEALTH_CHECK_TIMEOUT_SECS,
        }
    }
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub validation: ValidationConfig,
    pub storage: StorageConfig,
    pub transcode: TranscodeConfig,
    pub mint: MintConfig,
    pub attribution: AttributionConfig,
    pub health: HealthCheckConfig,
}

impl Config {
    /// Configuration with provider defaults and the given minting backend.
    pub fn new(mint_endpoint: impl Into<String>) -> Self {
        Self {
            environment: "development".to_string(),
            validation: ValidationConfig::default(),
            storage: StorageConfig::default(),
            transcode: TranscodeConfig::default(),
            mint: MintConfig::new(mint_endpoint),
            attribution: AttributionConfig::default(),
            health: HealthCheckConfig::default(),
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_upload_size_mb: u64 =
            env_parse("MAX_UPLOAD_SIZE_MB", DEFAULT_MAX_UPLOAD_BYTES / 1024 / 1024);

        let allowed_content_types = env_list("ALLOWED_AUDIO_CONTENT_TYPES")
            .map(|types| types.iter().map(|t| t.to_lowercase()).collect())
            .unwrap_or_else(|| ValidationConfig::default().allowed_content_types);

        let provider = match env_opt("STORAGE_PROVIDER") {
            Some(value) => value.parse::<StorageProvider>()?,
            None => StorageProvider::Pinata,
        };

        let storage_defaults = StorageConfig::default();
        let storage = StorageConfig {
            provider,
            endpoint: env_opt("STORAGE_ENDPOINT").unwrap_or(storage_defaults.endpoint),
            gateway_url: env_opt("STORAGE_GATEWAY_URL").unwrap_or(storage_defaults.gateway_url),
            pinata_jwt: env_opt("PINATA_JWT").map(SecretString::new),
            pinata_api_key: env_opt("PINATA_API_KEY").map(SecretString::new),
            pinata_secret_key: env_opt("PINATA_SECRET_KEY").map(SecretString::new),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            timeout_seconds: env_parse("STORAGE_TIMEOUT_SECS", STORAGE_TIMEOUT_SECS),
        };

        let transcode_defaults = TranscodeConfig::default();
        let transcode = TranscodeConfig {
            enabled: env_bool("TRANSCODE_ENABLED", true),
            endpoint: env_opt("TRANSCODE_ENDPOINT").unwrap_or(transcode_defaults.endpoint),
            api_key: env_opt("LIVEPEER_API_KEY").map(SecretString::new),
            playback_base_url: env_opt("PLAYBACK_BASE_URL")
                .unwrap_or(transcode_defaults.playback_base_url),
            timeout_seconds: env_parse("TRANSCODE_TIMEOUT_SECS", TRANSCODE_TIMEOUT_SECS),
        };

        let mint_endpoint = env_opt("MINT_ENDPOINT")
            .ok_or_else(|| anyhow::anyhow!("MINT_ENDPOINT must be set to a minting backend URL"))?;
        let mint = MintConfig {
            endpoint: mint_endpoint,
            api_key: env_opt("MINT_API_KEY").map(SecretString::new),
            network: env_opt("MINT_NETWORK").unwrap_or_else(|| "solana-devnet".to_string()),
            timeout_seconds: env_parse("MINT_TIMEOUT_SECS", MINT_TIMEOUT_SECS),
        };

        let attribution = AttributionConfig {
            webhook_url: env_opt("ATTRIBUTION_WEBHOOK_URL"),
            endpoint: env_opt("ATTRIBUTION_ENDPOINT"),
            signing_secret: env_opt("ATTRIBUTION_SIGNING_SECRET").map(SecretString::new),
            platform: env_opt("PLATFORM_NAME").unwrap_or_else(|| "beatschain".to_string()),
            upload_revenue_amount: env_parse("UPLOAD_REVENUE_AMOUNT", UPLOAD_REVENUE_AMOUNT),
            timeout_seconds: env_parse("ATTRIBUTION_TIMEOUT_SECS", ATTRIBUTION_TIMEOUT_SECS),
        };

        let health = HealthCheckConfig {
            targets: env_list("HEALTH_CHECK_URLS").unwrap_or_default(),
            interval_seconds: env_parse("HEALTH_CHECK_INTERVAL_SECS", HEALTH_CHECK_INTERVAL_SECS),
            timeout_seconds: env_parse("HEALTH_CHECK_TIMEOUT_SECS", HEALTH_CHECK_TIMEOUT_SECS),
        };

        let config = Config {
            environment,
            validation: ValidationConfig {
                max_file_size_bytes: megabytes_to_bytes(max_upload_size_mb)?,
                allowed_content_types,
            },
            storage,
            transcode,
            mint,
            attribution,
            health,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.validation.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        if self.validation.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_AUDIO_CONTENT_TYPES must list at least one content type"
            ));
        }

        match self.storage.provider {
            StorageProvider::Pinata => {
                if self.is_production() && !self.storage.has_pinata_credentials() {
                    return Err(anyhow::anyhow!(
                        "PINATA_JWT or PINATA_API_KEY and PINATA_SECRET_KEY must be set in production"
                    ));
                }
            }
            StorageProvider::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage provider"
                    ));
                }
                if self.storage.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage provider"
                    ));
                }
            }
        }

        if !is_http_url(&self.mint.endpoint) {
            return Err(anyhow::anyhow!(
                "MINT_ENDPOINT must be an http(s) URL, got '{}'",
                self.mint.endpoint
            ));
        }

        for url in self
            .attribution
            .webhook_url
            .iter()
            .chain(self.attribution.endpoint.iter())
            .chain(self.health.targets.iter())
        {
            if !is_http_url(url) {
                return Err(anyhow::anyhow!("'{}' is not an http(s) URL", url));
            }
        }

        if !(self.attribution.upload_revenue_amount > 0.0) {
            return Err(anyhow::anyhow!("UPLOAD_REVENUE_AMOUNT must be positive"));
        }

        if self.health.interval_seconds == 0 {
            return Err(anyhow::anyhow!(
                "HEALTH_CHECK_INTERVAL_SECS must be greater than zero"
            ));
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_list(key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = env_opt(key)?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn megabytes_to_bytes(megabytes: u64) -> Result<u64, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", megabytes))
}
