use std::sync::Arc;

use sqlx::PgPool;
use wayfare_application::{
    AccessRepository, AuditRepository, SecurityAdminRepository, UserRepository,
};
use wayfare_core::AppResult;
use wayfare_infrastructure::{
    InMemoryAccessStore, PostgresAccessRepository, PostgresAuditRepository,
    PostgresSecurityAdminRepository, PostgresUserRepository,
};

/// Store adapters behind the application ports.
#[derive(Clone)]
pub struct RepositorySet {
    pub access_repository: Arc<dyn AccessRepository>,
    pub security_admin_repository: Arc<dyn SecurityAdminRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub audit_repository: Arc<dyn AuditRepository>,
}

impl RepositorySet {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            access_repository: Arc::new(PostgresAccessRepository::new(pool.clone())),
            security_admin_repository: Arc::new(PostgresSecurityAdminRepository::new(
                pool.clone(),
            )),
            user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
        }
    }

    /// Process-local store seeded with the default role catalog.
    pub fn memory() -> AppResult<Self> {
        Ok(Self::from_store(Arc::new(InMemoryAccessStore::seeded()?)))
    }

    pub fn from_store(store: Arc<InMemoryAccessStore>) -> Self {
        Self {
            access_repository: store.clone(),
            security_admin_repository: store.clone(),
            user_repository: store.clone(),
            audit_repository: store,
        }
    }
}
