//! # Service Container
//!
//! ## Initialization Order
//!
//! ```text
//! Phase 1: Storage backend (memory or RocksDB) and clock
//! Phase 2: Record Store, Notification Dispatcher (share the backend)
//! Phase 3: Moderation Engine (depends on both)
//! Phase 4: Event bus
//! ```

use std::sync::Arc;

use shared_bus::InMemoryEventBus;
use shared_types::{InMemoryKVStore, KVStoreError, KeyValueStore, SystemTimeSource, TimeSource};
use thiserror::Error;
use tracing::{info, instrument};
use tw_01_record_store::RecordStoreService;
use tw_02_moderation::ModerationEngine;
use tw_03_notifications::NotificationDispatcher;

use crate::container::config::{AppConfig, ConfigError, StorageBackend};

/// Storage backend shared by every subsystem.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Clock shared by every subsystem.
pub type Clock = Arc<dyn TimeSource>;

/// Concrete Record Store over the shared backend.
pub type RecordStore = RecordStoreService<SharedStore, Clock>;

/// Concrete Notification Dispatcher over the shared backend.
pub type Dispatcher = NotificationDispatcher<SharedStore, Clock>;

/// Concrete Moderation Engine.
pub type Engine = ModerationEngine<Arc<RecordStore>, Arc<Dispatcher>, Clock>;

/// Errors raised while assembling the container.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("storage backend failed to open: {0}")]
    Storage(#[from] KVStoreError),
}

/// Central container holding all subsystem instances.
pub struct ServiceContainer {
    /// Record Store (Subsystem 1).
    pub records: Arc<RecordStore>,

    /// Moderation Engine (Subsystem 2).
    pub moderation: Arc<Engine>,

    /// Notification Dispatcher (Subsystem 3).
    pub notifications: Arc<Dispatcher>,

    /// Post-commit event bus.
    pub event_bus: Arc<InMemoryEventBus>,

    /// Configuration (immutable after initialization).
    pub config: AppConfig,
}

impl ServiceContainer {
    /// Validate `config`, open the configured backend and wire the services.
    #[instrument(name = "container_init", skip(config))]
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        config.validate()?;
        let store = Self::open_store(&config)?;
        Ok(Self::with_store(config, store, Arc::new(SystemTimeSource)))
    }

    /// Wire the services over an already opened backend.
    ///
    /// Used by tests to inject a `MockTimeSource` or a failing store.
    pub fn with_store(config: AppConfig, store: SharedStore, clock: Clock) -> Self {
        info!("Phase 2: Initializing Record Store and Notification Dispatcher");
        let records = Arc::new(RecordStoreService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.record_store(),
        ));
        let notifications = Arc::new(NotificationDispatcher::new(
            store,
            Arc::clone(&clock),
            config.dispatcher(),
        ));

        info!(
            max_commit_attempts = config.moderation.max_commit_attempts,
            "Phase 3: Initializing Moderation Engine"
        );
        let moderation = Arc::new(ModerationEngine::new(
            Arc::clone(&records),
            Arc::clone(&notifications),
            clock,
            config.moderation.clone(),
        ));

        info!("Phase 4: Creating event bus");
        let event_bus = Arc::new(InMemoryEventBus::new());

        Self {
            records,
            moderation,
            notifications,
            event_bus,
            config,
        }
    }

    fn open_store(config: &AppConfig) -> Result<SharedStore, StartupError> {
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Phase 1: Using in-memory storage (data is lost on exit)");
                Ok(Arc::new(InMemoryKVStore::new()))
            }
            StorageBackend::RocksDb => Self::open_rocksdb(config),
        }
    }

    #[cfg(feature = "rocksdb")]
    fn open_rocksdb(config: &AppConfig) -> Result<SharedStore, StartupError> {
        use crate::adapters::storage::{RocksDbConfig, RocksDbStore};

        let path = config.storage.data_dir.join("rocksdb");
        info!(path = ?path, "Phase 1: Opening RocksDB storage");
        let store = RocksDbStore::open(RocksDbConfig {
            path,
            sync_writes: config.storage.sync_writes,
            ..Default::default()
        })?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "rocksdb"))]
    fn open_rocksdb(_config: &AppConfig) -> Result<SharedStore, StartupError> {
        Err(ConfigError::BackendUnavailable(StorageBackend::RocksDb).into())
    }
}
