//! # Application Configuration
//!
//! Unified configuration for the subsystems and the runtime.
//!
//! Defaults are usable for development; every field that matters in
//! production can be overridden from the environment (see `load_config`).

use std::path::PathBuf;
use tracing::{info, warn};
use tw_01_record_store::RecordStoreConfig;
use tw_02_moderation::ModerationConfig;
use tw_03_notifications::DispatcherConfig;

/// Complete application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Moderation limits and commit retry budget.
    pub moderation: ModerationConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reject configurations the services cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.moderation.max_commit_attempts == 0 {
            return Err(ConfigError::ZeroCommitAttempts);
        }
        for (name, value) in [
            ("max_reason_len", self.moderation.max_reason_len),
            ("max_species_len", self.moderation.max_species_len),
            ("max_description_len", self.moderation.max_description_len),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit(name));
            }
        }
        if self.storage.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::BackendUnavailable(self.storage.backend));
        }
        Ok(())
    }

    /// Record Store settings derived from the moderation limits.
    pub fn record_store(&self) -> RecordStoreConfig {
        RecordStoreConfig {
            max_species_len: self.moderation.max_species_len,
            max_description_len: self.moderation.max_description_len,
            max_commit_attempts: self.moderation.max_commit_attempts,
        }
    }

    /// Notification Dispatcher settings.
    pub fn dispatcher(&self) -> DispatcherConfig {
        DispatcherConfig {
            max_commit_attempts: self.moderation.max_commit_attempts,
        }
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("TREEWATCH_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup("TREEWATCH_STORAGE_BACKEND") {
            match StorageBackend::parse(&backend) {
                Some(b) => self.storage.backend = b,
                None => warn!(value = %backend, "TREEWATCH_STORAGE_BACKEND must be memory or rocksdb"),
            }
        }
        if let Some(sync) = lookup("TREEWATCH_SYNC_WRITES") {
            match sync.parse() {
                Ok(v) => self.storage.sync_writes = v,
                Err(_) => warn!(value = %sync, "TREEWATCH_SYNC_WRITES must be true or false"),
            }
        }
        if let Some(attempts) = lookup("TREEWATCH_MAX_COMMIT_ATTEMPTS") {
            match attempts.parse() {
                Ok(v) => self.moderation.max_commit_attempts = v,
                Err(_) => warn!(value = %attempts, "TREEWATCH_MAX_COMMIT_ATTEMPTS must be a number"),
            }
        }
        if let Some(level) = lookup("TREEWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

/// Load configuration from defaults and environment variables.
pub fn load_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.apply_overrides(|name| std::env::var(name).ok());
    info!(
        backend = ?config.storage.backend,
        data_dir = ?config.storage.data_dir,
        "configuration loaded"
    );
    config
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Commits would never be attempted.
    ZeroCommitAttempts,
    /// A length limit is zero.
    ZeroLimit(&'static str),
    /// The selected backend was not compiled in.
    BackendUnavailable(StorageBackend),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroCommitAttempts => {
                write!(f, "TREEWATCH_MAX_COMMIT_ATTEMPTS must be at least 1")
            }
            ConfigError::ZeroLimit(name) => write!(f, "{name} must be greater than zero"),
            ConfigError::BackendUnavailable(backend) => write!(
                f,
                "storage backend {backend:?} is not available; rebuild with --features rocksdb"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which `KeyValueStore` implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local, lost on exit.
    #[default]
    Memory,
    /// RocksDB under `data_dir`.
    RocksDb,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "rocksdb" => Some(Self::RocksDb),
            _ => None,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the RocksDB backend.
    pub data_dir: PathBuf,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
            sync_writes: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
