//! User lifecycle: registration, password login and account status.
//!
//! Login failures are reported through one generic outcome so callers
//! cannot discover which emails are registered.

use std::sync::Arc;

use async_trait::async_trait;

use wayfare_core::{AppError, AppResult};
use wayfare_domain::{
    Action, AuditAction, EmailAddress, PermissionKey, ResourceName, User, UserId, UserStatus,
    validate_password,
};

use crate::{
    AuditEvent, AuditRepository, AuthContext, AuthorizationService, CredentialIssuer,
    IssuedCredential,
};

mod login;
mod registration;
mod status;

/// Role assigned to self-registered accounts when it exists.
pub const DEFAULT_ROLE_NAME: &str = "Customer";

/// Legacy primary role label stored on self-registered accounts.
pub const DEFAULT_PRIMARY_ROLE: &str = "customer";

/// User record with its stored password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Stored user.
    pub user: User,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// Input for persisting a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Canonical email address.
    pub email: EmailAddress,
    /// Display name.
    pub display_name: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Legacy primary role label.
    pub primary_role: String,
    /// Role assigned in the same transaction when a role with this name exists.
    pub initial_role: Option<String>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by canonical email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Creates an active user. Fails with a conflict for a taken email.
    async fn create_user(&self, input: NewUser) -> AppResult<User>;

    /// Changes the account status.
    async fn set_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Parameters for self-registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub display_name: String,
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials matched an active account.
    Authenticated {
        /// Authenticated user.
        user: User,
        /// Signed bearer credential.
        credential: IssuedCredential,
    },
    /// Any failure. Carries no reason.
    Failed,
}

/// Application service for user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    credential_issuer: Arc<dyn CredentialIssuer>,
    authorization_service: AuthorizationService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl UserService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        credential_issuer: Arc<dyn CredentialIssuer>,
        authorization_service: AuthorizationService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            credential_issuer,
            authorization_service,
            audit_repository,
        }
    }
}
