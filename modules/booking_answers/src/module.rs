//! Module declaration and lifecycle

use crate::config::Config;
use crate::contract::BookingAnswersApi;
use crate::domain::{CapabilityChecker, Service};
use crate::infra::storage::repositories::{
    SeaOrmBookingAnswersRepository, SeaOrmBookingOptionRepository,
};
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::path::Path;
use std::sync::Arc;

/// Booking answers module
pub struct BookingAnswersModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for BookingAnswersModule {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl BookingAnswersModule {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            service: RwLock::new(None),
        }
    }

    /// Module configured from a YAML file and `BOOKING_ANSWERS_` variables
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Config::load(path)?))
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Wire repositories and the domain service, returning the native client
    pub fn init(
        &self,
        db: Arc<DatabaseConnection>,
        capabilities: Arc<dyn CapabilityChecker>,
    ) -> Result<Arc<dyn BookingAnswersApi>> {
        let config = self.config();

        // Build repositories
        let answers_repo = Arc::new(SeaOrmBookingAnswersRepository::new(
            db.clone(),
            config.table_prefix.clone(),
        ));
        let options_repo = Arc::new(SeaOrmBookingOptionRepository::new(db));

        // Build domain service
        let service = Arc::new(Service::new(answers_repo, options_repo, capabilities, config));
        *self.service.write() = Some(service.clone());

        let client: Arc<dyn BookingAnswersApi> =
            Arc::new(crate::api::native::NativeClient::new(service));

        tracing::info!("Booking answers module initialized with native client");
        Ok(client)
    }

    /// Create the booking tables when they do not exist yet
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Booking answers migrations completed");
        Ok(())
    }

    /// Domain service, once the module is initialized
    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }
}
