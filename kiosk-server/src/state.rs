//! Application state

use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::clock::{Clock, SystemClock};
use crate::config::{BoxError, Config, StoreBackend};
use crate::eligibility::EligibilityPolicy;
use crate::locks::StudentLocks;
use crate::sheets::{GoogleSheetsStore, MemoryStore, SheetSchema, SheetStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registration and order tables
    pub store: Arc<dyn SheetStore>,
    /// Column layout resolved from the header rows at startup
    pub schema: Arc<SheetSchema>,
    pub policy: EligibilityPolicy,
    pub timezone: Tz,
    pub paid_marker: String,
    pub menu: Arc<Vec<String>>,
    pub clock: Arc<dyn Clock>,
    pub locks: StudentLocks,
}

impl AppState {
    /// Build the configured store and resolve its schema
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn SheetStore> = match (config.store_backend, &config.google) {
            (StoreBackend::Google, Some(google)) => Arc::new(GoogleSheetsStore::new(
                &google.spreadsheet_id,
                &google.client_email,
                &google.private_key,
                config.registration_range.clone(),
                config.orders_range.clone(),
                config.store_timeout,
            )?),
            (StoreBackend::Google, None) => {
                return Err("Google backend selected without credentials".into());
            }
            (StoreBackend::Memory, _) => Arc::new(MemoryStore::with_headers(
                &config.registration_columns,
                &config.order_columns,
            )),
        };

        Self::with_store(config, store, Arc::new(SystemClock)).await
    }

    /// Build state around an existing store and clock
    pub async fn with_store(
        config: &Config,
        store: Arc<dyn SheetStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BoxError> {
        let schema = SheetSchema::load(
            store.as_ref(),
            &config.registration_columns,
            &config.order_columns,
        )
        .await?;
        tracing::info!(backend = store.backend_name(), ?schema, "Spreadsheet schema resolved");

        Ok(Self {
            store,
            schema: Arc::new(schema),
            policy: config.policy,
            timezone: config.timezone,
            paid_marker: config.paid_marker.clone(),
            menu: Arc::new(config.menu.clone()),
            clock,
            locks: StudentLocks::new(),
        })
    }

    /// Current time in the kiosk timezone
    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now(self.timezone)
    }
}
