//! Shared fixtures for the integration tests.

use std::sync::Arc;

use app_runtime::container::{AppConfig, ServiceContainer};
use app_runtime::TreewatchApp;
use shared_types::{InMemoryKVStore, MockTimeSource, Principal};
use tw_01_record_store::NewTree;

/// Fixed starting time: 2023-11-14T22:13:20Z.
pub const START_MS: u64 = 1_700_000_000_000;

/// A wired application plus handles the tests need to poke at.
pub struct Harness {
    pub app: TreewatchApp,
    pub container: Arc<ServiceContainer>,
    pub store: Arc<InMemoryKVStore>,
    pub clock: Arc<MockTimeSource>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryKVStore::new());
        let clock = Arc::new(MockTimeSource::new(START_MS));
        let container = Arc::new(ServiceContainer::with_store(
            config,
            store.clone(),
            clock.clone(),
        ));
        Self {
            app: TreewatchApp::new(Arc::clone(&container)),
            container,
            store,
            clock,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn alice() -> Principal {
    Principal::standard(1)
}

pub fn bob() -> Principal {
    Principal::standard(2)
}

pub fn carol() -> Principal {
    Principal::standard(3)
}

pub fn moderator() -> Principal {
    Principal::moderator(100)
}

pub fn oak() -> NewTree {
    NewTree::new("White Oak", 39.9526, -75.1652)
        .with_description("Old tree by the library")
        .with_measurements(Some(60.0), Some(30.0))
}
