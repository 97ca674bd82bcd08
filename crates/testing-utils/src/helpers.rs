//! Test environment helpers

use escalator_core::{
    config::{InvokerMode, StorageBackend, TelephonyMode},
    AppConfig, ObjectStore, CONTENT_TYPE_JSON,
};
use escalator_infrastructure::InMemoryObjectStore;

/// Test environment setup utilities
pub struct TestEnv;

impl TestEnv {
    /// Default configuration switched to in-memory storage, dry-run
    /// telephony and a disabled invoker.
    pub fn app_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.telephony.mode = TelephonyMode::DryRun;
        config.invoker.mode = InvokerMode::Disabled;
        config
    }

    /// In-memory store pre-loaded with a roster under the configured key
    pub async fn store_with_roster(config: &AppConfig, roster: Vec<u8>) -> InMemoryObjectStore {
        let store = InMemoryObjectStore::new();
        store
            .put(&config.roster.key, roster, CONTENT_TYPE_JSON)
            .await
            .unwrap();
        store
    }
}
