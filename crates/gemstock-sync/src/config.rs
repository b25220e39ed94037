//! # Configuration
//!
//! Static configuration for the engine: where the remote document service
//! lives, where the Local Store file is, and how often to reconcile.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GEMSTOCK_API_BASE_URL, GEMSTOCK_FILE_NAME, GEMSTOCK_DB_PATH,       │
//! │     GEMSTOCK_SYNC_INTERVAL, GEMSTOCK_SYNC_TOKEN                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/gemstock/gemstock.toml (Linux)                           │
//! │     ~/Library/Application Support/com.gemstock.gemstock/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The credential, document id and enabled flag are NOT configuration: they
//! live in the Local Store and change only through the settings update.
//! `GEMSTOCK_SYNC_TOKEN` merely offers a first credential, the same way a
//! launch URL can.
//!
//! ## Configuration File Format
//! ```toml
//! [remote]
//! api_base_url = "https://api.github.com"
//! file_name = "jewelry-inventory.json"
//! description = "Jewelry inventory"
//! public = false
//!
//! [storage]
//! database_path = "/var/lib/gemstock/gemstock.db"
//!
//! [sync]
//! interval_secs = 300
//! bootstrap_param = "token"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};

/// Default database file name inside the platform data directory.
pub const DATABASE_FILE: &str = "gemstock.db";

/// Default config file name inside the platform config directory.
pub const CONFIG_FILE: &str = "gemstock.toml";

// =============================================================================
// Remote Document Service
// =============================================================================

/// Where and how the remote document is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API root of the snippet service.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Name of the content block holding the collection.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Metadata shown next to the document in the service's UI.
    #[serde(default = "default_description")]
    pub description: String,

    /// Sent as `User-Agent`; the service rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whether created documents are publicly listed.
    #[serde(default)]
    pub public: bool,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_file_name() -> String {
    "jewelry-inventory.json".to_string()
}

fn default_description() -> String {
    "Jewelry inventory".to_string()
}

fn default_user_agent() -> String {
    format!("gemstock/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            api_base_url: default_api_base_url(),
            file_name: default_file_name(),
            description: default_description(),
            user_agent: default_user_agent(),
            public: false,
        }
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Local Store location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Sync Schedule
// =============================================================================

/// Reconcile schedule and first-run credential handling.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSchedule {
    /// Seconds between automatic reconciles. 0 disables them.
    #[serde(default)]
    pub interval_secs: u64,

    /// Query parameter of a launch URL that carries a first credential.
    #[serde(default = "default_bootstrap_param")]
    pub bootstrap_param: String,

    /// Credential offered through the environment. Never read from or
    /// written to the file.
    #[serde(skip)]
    pub bootstrap_credential: Option<String>,
}

fn default_bootstrap_param() -> String {
    "token".to_string()
}

impl Default for SyncSchedule {
    fn default() -> Self {
        SyncSchedule {
            interval_secs: 0,
            bootstrap_param: default_bootstrap_param(),
            bootstrap_credential: None,
        }
    }
}

impl fmt::Debug for SyncSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSchedule")
            .field("interval_secs", &self.interval_secs)
            .field("bootstrap_param", &self.bootstrap_param)
            .field(
                "bootstrap_credential",
                &self.bootstrap_credential.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GemstockConfig {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub sync: SyncSchedule,
}

impl GemstockConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`gemstock.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults (plus environment) if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            if let Err(e) = config.validate() {
                warn!("Environment overrides rejected: {}. Using plain defaults.", e);
                return Self::default();
            }
            config
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        let url = Url::parse(&self.remote.api_base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SyncError::InvalidUrl(format!(
                "API base URL must be http(s), got: {}",
                self.remote.api_base_url
            )));
        }

        if self.remote.file_name.trim().is_empty() {
            return Err(SyncError::InvalidConfig("file_name must not be empty".into()));
        }

        if self.sync.bootstrap_param.trim().is_empty() {
            return Err(SyncError::InvalidConfig(
                "bootstrap_param must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any variable source.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("GEMSTOCK_API_BASE_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.remote.api_base_url = url;
        }

        if let Some(name) = var("GEMSTOCK_FILE_NAME") {
            self.remote.file_name = name;
        }

        if let Some(path) = var("GEMSTOCK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(interval) = var("GEMSTOCK_SYNC_INTERVAL") {
            match interval.parse::<u64>() {
                Ok(secs) => self.sync.interval_secs = secs,
                Err(_) => warn!(value = %interval, "Ignoring non-numeric GEMSTOCK_SYNC_INTERVAL"),
            }
        }

        if let Some(token) = var("GEMSTOCK_SYNC_TOKEN").filter(|t| !t.trim().is_empty()) {
            debug!("Credential offered through environment");
            self.sync.bootstrap_credential = Some(token);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolved Local Store path: configured, else platform data dir, else
    /// the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join(DATABASE_FILE)))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "gemstock", "gemstock")
}
