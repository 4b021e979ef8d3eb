use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};

use crate::auth::notifier::{LogNotifier, ResetNotifier};
use crate::config::{AppConfig, StorageBackend};
use crate::db::PgStore;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub notifier: Arc<dyn ResetNotifier>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match config.storage {
            StorageBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
                let pg = PgStore::connect(url, config.max_connections).await?;
                if let Err(e) = pg.migrate().await {
                    warn!(error = %e, "migrations failed; continuing");
                }
                info!("using postgres storage");
                Store::postgres(pg)
            }
            StorageBackend::Memory => {
                warn!("using in-memory storage; data is lost on restart");
                Store::memory()
            }
        };

        Ok(Self::from_parts(config, store, Arc::new(LogNotifier)))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Store,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        Self {
            config,
            store,
            notifier,
        }
    }

    /// Memory-backed state with fixed JWT settings.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::for_memory("test-secret")),
            Store::memory(),
            Arc::new(LogNotifier),
        )
    }
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
