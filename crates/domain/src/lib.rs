//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod authorization;
mod security;
mod user;

pub use authorization::{
    AllowBasis, AuthorizationDecision, DEFAULT_SUPERUSER_ROLES, DecisionEngine, PermissionSet,
};
pub use security::{
    Action, AuditAction, Permission, PermissionId, PermissionKey, ResourceName, Role, RoleGrant,
    RoleId, RoleKind,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, User, UserId, UserStatus,
    validate_password,
};
