//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod audit_ports;
mod authorization_service;
mod identity_resolver;
mod permission_aggregator;
mod security_admin_ports;
mod security_admin_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    AccessRepository, CredentialIssuer, CredentialVerifier, IssuedCredential, SubjectClaim,
};
pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthContext, AuthorizationService};
pub use identity_resolver::{IdentityResolver, ResolvedIdentity};
pub use permission_aggregator::PermissionAggregator;
pub use security_admin_ports::{
    CreatePermissionInput, CreateRoleInput, GrantPermissionInput, RoleDetails,
    SecurityAdminRepository, UpdateRoleInput,
};
pub use security_admin_service::SecurityAdminService;
pub use user_service::{
    DEFAULT_PRIMARY_ROLE, DEFAULT_ROLE_NAME, LoginOutcome, NewUser, PasswordHasher,
    RegisterParams, UserRecord, UserRepository, UserService,
};
