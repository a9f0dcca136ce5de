use std::sync::Arc;

use crate::core::{Config, Result, StoreKind};
use crate::db::{BillStore, MemoryStore, ShiftStore, SurrealStore};
use crate::sales::SalesService;
use crate::shifts::ShiftService;

/// Shared per-request state
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub sales: SalesService,
    pub shifts: ShiftService,
    pub store_kind: StoreKind,
}

impl ServerState {
    /// Wire services over explicit stores
    pub fn with_stores(
        config: Config,
        bills: Arc<dyn BillStore>,
        shifts: Arc<dyn ShiftStore>,
        store_kind: StoreKind,
    ) -> Self {
        let tz = config.timezone;
        let timeout = config.store_timeout();
        Self {
            sales: SalesService::new(bills.clone(), shifts.clone(), tz, timeout),
            shifts: ShiftService::new(shifts, bills, tz, timeout),
            config,
            store_kind,
        }
    }

    /// State backed by a fresh [`MemoryStore`]
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(config, store.clone(), store, StoreKind::Memory)
    }

    /// Open the configured store backend
    pub async fn initialize(config: &Config) -> Result<Self> {
        match config.store_backend {
            StoreKind::Memory => {
                tracing::warn!("Using in-memory store, data is lost on restart");
                Ok(Self::in_memory(config.clone()))
            }
            StoreKind::Surreal => {
                let store = Arc::new(SurrealStore::open(config.database_path()).await?);
                Ok(Self::with_stores(
                    config.clone(),
                    store.clone(),
                    store,
                    StoreKind::Surreal,
                ))
            }
        }
    }
}
