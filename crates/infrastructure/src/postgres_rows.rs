//! Row shapes shared by the PostgreSQL adapters.

use std::str::FromStr;

use sqlx::FromRow;

use wayfare_core::{AppError, AppResult};
use wayfare_domain::{
    Permission, PermissionId, PermissionKey, Role, RoleGrant, RoleId, RoleKind, User, UserId,
    UserStatus,
};

/// Maps a driver error, treating connection-level failures as unavailability.
pub(crate) fn store_error(operation: &str, error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => {
            AppError::Unavailable(format!("failed to {operation}: {error}"))
        }
        _ => AppError::Internal(format!("failed to {operation}: {error}")),
    }
}

/// Maps unique violations to a conflict and everything else through
/// [`store_error`].
pub(crate) fn conflict_or_store_error(
    error: sqlx::Error,
    operation: &str,
    conflict: impl FnOnce() -> String,
) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict());
    }

    store_error(operation, error)
}

fn corrupt(kind: &str, id: uuid::Uuid, error: AppError) -> AppError {
    AppError::Internal(format!("invalid stored {kind} '{id}': {error}"))
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: uuid::Uuid,
    pub email: String,
    pub display_name: String,
    pub primary_role: String,
    pub status: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> AppResult<User> {
        let id = self.id;
        let status =
            UserStatus::from_str(&self.status).map_err(|error| corrupt("user", id, error))?;
        User::new(
            UserId::from_uuid(id),
            self.email,
            self.display_name,
            self.primary_role,
            status,
        )
        .map_err(|error| corrupt("user", id, error))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RoleRow {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub is_system: bool,
    pub kind: String,
}

impl RoleRow {
    pub(crate) fn into_role(self) -> AppResult<Role> {
        let id = self.id;
        let kind = RoleKind::from_str(&self.kind).map_err(|error| corrupt("role", id, error))?;
        Role::new(
            RoleId::from_uuid(id),
            self.name,
            self.description,
            self.is_system,
            kind,
        )
        .map_err(|error| corrupt("role", id, error))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PermissionRow {
    pub id: uuid::Uuid,
    pub resource: String,
    pub action: String,
    pub description: String,
    pub category: String,
}

impl PermissionRow {
    pub(crate) fn into_permission(self) -> AppResult<Permission> {
        let id = self.id;
        let key = PermissionKey::parse(&self.resource, &self.action)
            .map_err(|error| corrupt("permission", id, error))?;
        Ok(Permission::new(
            PermissionId::from_uuid(id),
            key,
            self.description,
            self.category,
        ))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct GrantRow {
    pub role_id: uuid::Uuid,
    pub granted: bool,
    pub conditions: Option<serde_json::Value>,
    #[sqlx(flatten)]
    pub permission: PermissionRow,
}

impl GrantRow {
    pub(crate) fn into_grant(self) -> AppResult<RoleGrant> {
        Ok(RoleGrant {
            role_id: RoleId::from_uuid(self.role_id),
            permission: self.permission.into_permission()?,
            granted: self.granted,
            conditions: self.conditions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PermissionRow, RoleRow, UserRow};
    use wayfare_domain::RoleKind;

    #[test]
    fn role_row_converts_kind() {
        let role = RoleRow {
            id: uuid::Uuid::new_v4(),
            name: "Local Expert".to_owned(),
            description: String::new(),
            is_system: true,
            kind: "external".to_owned(),
        }
        .into_role()
        .unwrap_or_else(|_| panic!("test"));

        assert_eq!(role.kind(), RoleKind::External);
        assert!(role.is_system());
    }

    #[test]
    fn unknown_status_is_reported_as_internal() {
        let result = UserRow {
            id: uuid::Uuid::new_v4(),
            email: "ana@example.com".to_owned(),
            display_name: "Ana".to_owned(),
            primary_role: "customer".to_owned(),
            status: "banned".to_owned(),
        }
        .into_user();

        assert!(matches!(result, Err(wayfare_core::AppError::Internal(_))));
    }

    #[test]
    fn permission_row_builds_label() {
        let permission = PermissionRow {
            id: uuid::Uuid::new_v4(),
            resource: "bookings".to_owned(),
            action: "create".to_owned(),
            description: String::new(),
            category: "operations".to_owned(),
        }
        .into_permission()
        .unwrap_or_else(|_| panic!("test"));

        assert_eq!(permission.name(), "bookings:create");
    }
}
