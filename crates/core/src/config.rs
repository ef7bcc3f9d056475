//! Configuration management
//!
//! Credentials are read from the process environment only. Bucket, prefix and
//! endpoint are resolved from CLI/environment overrides, then the optional TOML
//! file at `<config_dir>/bm/config.toml`, then built-in defaults.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Bucket used when nothing else is configured
pub const DEFAULT_BUCKET: &str = "developer-task";

/// Key prefix used when nothing else is configured
pub const DEFAULT_PREFIX: &str = "x-wing/";

/// Region used when neither region variable is set
pub const DEFAULT_REGION: &str = "us-east-1";

pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION_VAR: &str = "AWS_REGION";
pub const FALLBACK_REGION_VAR: &str = "AWS_DEFAULT_REGION";

/// Overrides the directory holding `config.toml`
pub const CONFIG_DIR_VAR: &str = "BM_CONFIG_DIR";

/// Static credentials and region for the storage client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let access_key = get(ACCESS_KEY_VAR).ok_or(Error::MissingCredential(ACCESS_KEY_VAR))?;
        let secret_key = get(SECRET_KEY_VAR).ok_or(Error::MissingCredential(SECRET_KEY_VAR))?;
        let region = get(REGION_VAR)
            .or_else(|| get(FALLBACK_REGION_VAR))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            access_key,
            secret_key,
            region,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// On-disk configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub bucket: Option<String>,

    #[serde(default)]
    pub prefix: Option<String>,

    /// Endpoint URL for S3-compatible backends
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            bucket: None,
            prefix: None,
            endpoint: None,
        }
    }
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub endpoint: Option<String>,
}

/// Resolved target of every operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bucket: String,
    pub prefix: String,
    pub endpoint: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            endpoint: None,
        }
    }
}

impl Settings {
    /// Merge overrides over the config file over the defaults
    pub fn resolve(overrides: Overrides, file: &ConfigFile) -> Result<Self> {
        let bucket = overrides
            .bucket
            .or_else(|| file.bucket.clone())
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        let prefix = overrides
            .prefix
            .or_else(|| file.prefix.clone())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let endpoint = overrides
            .endpoint
            .or_else(|| file.endpoint.clone())
            .filter(|e| !e.trim().is_empty());

        if bucket.trim().is_empty() {
            return Err(Error::Config("bucket name cannot be empty".into()));
        }

        if prefix.trim().is_empty() {
            return Err(Error::Config("prefix cannot be empty".into()));
        }

        if let Some(endpoint) = &endpoint {
            url::Url::parse(endpoint)?;
        }

        Ok(Self {
            bucket,
            prefix,
            endpoint,
        })
    }

    /// Full object key for a name under the configured prefix
    pub fn key_for(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

/// Configuration manager handles locating and loading the config file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    ///
    /// `BM_CONFIG_DIR` takes precedence over the platform config directory.
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("bm"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// A missing file yields the default configuration.
    pub fn load(&self) -> Result<ConfigFile> {
        if !self.config_path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: ConfigFile = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade bm.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        tracing::debug!(path = %self.config_path.display(), "loaded configuration file");
        Ok(config)
    }
}
