use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::ExerciseTrackerConfig;
use crate::contract::client::ExerciseTrackerApi;
use crate::domain::repo::UsersRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ExerciseTrackerLocalClient;
use crate::infra::storage::{InMemoryUsersRepository, SeaOrmUsersRepository};

/// Where user records live.
pub enum Storage {
    /// Process-local, lost on restart.
    InMemory,
    /// SeaORM connection; migrations run during `init`.
    Database(DatabaseConnection),
}

/// Main module struct: owns the domain service and exposes it to REST and
/// in-process consumers.
#[derive(Default)]
pub struct ExerciseTracker {
    service: arc_swap::ArcSwapOption<Service>,
}

impl Clone for ExerciseTracker {
    fn clone(&self) -> Self {
        Self {
            service: arc_swap::ArcSwapOption::new(self.service.load_full()),
        }
    }
}

impl ExerciseTracker {
    pub async fn init(&self, cfg: ExerciseTrackerConfig, storage: Storage) -> anyhow::Result<()> {
        info!("Initializing exercise_tracker module");
        debug!(
            "Loaded exercise_tracker config: max_username_length={}",
            cfg.max_username_length
        );

        // Wire repository (infra) to domain service (port)
        let repo: Arc<dyn UsersRepository> = match storage {
            Storage::InMemory => {
                info!("Using in-memory user storage");
                Arc::new(InMemoryUsersRepository::new())
            }
            Storage::Database(conn) => {
                Self::migrate(&conn).await?;
                Arc::new(SeaOrmUsersRepository::new(conn))
            }
        };
        let service_config = ServiceConfig {
            max_username_length: cfg.max_username_length,
        };
        self.service
            .store(Some(Arc::new(Service::new(repo, service_config))));
        Ok(())
    }

    pub async fn migrate(conn: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running exercise_tracker database migrations");
        crate::infra::storage::migrations::Migrator::up(conn, None).await?;
        info!("Exercise tracker database migrations completed successfully");
        Ok(())
    }

    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    pub fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering exercise_tracker REST routes");
        let router = routes::register_routes(router, self.service()?)?;
        info!("Exercise tracker REST routes registered successfully");
        Ok(router)
    }

    /// In-process client over the same service the REST routes use.
    pub fn client(&self) -> anyhow::Result<Arc<dyn ExerciseTrackerApi>> {
        Ok(Arc::new(ExerciseTrackerLocalClient::new(self.service()?)))
    }
}
