//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_access_store;
mod jwt_credential_service;
mod postgres_access_repository;
mod postgres_audit_repository;
mod postgres_rows;
mod postgres_security_admin_repository;
mod postgres_user_repository;
mod seed_catalog;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_access_store::InMemoryAccessStore;
pub use jwt_credential_service::{JwtCredentialService, MAX_TTL_MINUTES, MIN_SECRET_LENGTH};
pub use postgres_access_repository::PostgresAccessRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
pub use postgres_user_repository::PostgresUserRepository;
