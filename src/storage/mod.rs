//! Storage layer for the gateway
//!
//! Credentials, fixed-window counters and audit entries sit behind three
//! traits so the pipeline never names a concrete backend.

/// Startup seeding
pub mod bootstrap;
/// Database storage module
pub mod database;
/// In-process storage module
pub mod memory;
/// Redis counter module
pub mod redis;
mod traits;

pub use self::database::Database;
pub use memory::MemoryStore;
pub use self::redis::RedisPool;
pub use traits::{AuditStore, CounterStore, CredentialStore, WindowCount};

use crate::config::{CounterBackend, CredentialBackend, StorageConfig};
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// The backends chosen for one running gateway
#[derive(Clone)]
pub struct StorageLayer {
    /// Users, roles and permissions
    pub credentials: Arc<dyn CredentialStore>,
    /// Rate-limit window counters
    pub counters: Arc<dyn CounterStore>,
    /// Request, auth and rate-limit audit sink
    pub audit: Arc<dyn AuditStore>,
}

impl StorageLayer {
    /// Connect the configured backends
    pub async fn new(config: &StorageConfig, counter_backend: CounterBackend) -> Result<Self> {
        info!("Initializing storage layer");

        let (credentials, audit): (Arc<dyn CredentialStore>, Arc<dyn AuditStore>) =
            match config.backend {
                CredentialBackend::Memory => {
                    debug!("Using in-process credential store");
                    let store = Arc::new(MemoryStore::new());
                    (store.clone(), store)
                }
                CredentialBackend::Database => {
                    debug!("Connecting to database");
                    let db = Arc::new(Database::new(&config.database).await?);
                    if config.database.migrate {
                        db.migrate().await?;
                    }
                    (db.clone(), db)
                }
            };

        let counters: Arc<dyn CounterStore> = match counter_backend {
            CounterBackend::Memory => Arc::new(MemoryStore::new()),
            CounterBackend::Redis => {
                debug!("Connecting to Redis");
                Arc::new(RedisPool::new(&config.redis).await?)
            }
        };

        info!("Storage layer initialized");
        Ok(Self {
            credentials,
            counters,
            audit,
        })
    }

    /// One shared in-process store for everything
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Wrap an existing in-process store
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            credentials: store.clone(),
            counters: store.clone(),
            audit: store,
        }
    }

    /// Check that every backend answers
    pub async fn health_check(&self) -> Result<()> {
        self.credentials.health_check().await?;
        self.counters.health_check().await?;
        Ok(())
    }
}

impl std::fmt::Debug for StorageLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageLayer").finish_non_exhaustive()
    }
}
