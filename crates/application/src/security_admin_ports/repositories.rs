use async_trait::async_trait;

use wayfare_core::AppResult;
use wayfare_domain::{Permission, PermissionId, Role, RoleGrant, RoleId, UserId};

use super::permissions::{CreatePermissionInput, GrantPermissionInput};
use super::roles::{CreateRoleInput, UpdateRoleInput};

/// Write side of the role and permission store.
///
/// Operations touching more than one association table must run in one
/// transaction.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by its unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Creates a custom role and attaches grants.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role>;

    /// Renames a role and optionally replaces its grants.
    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role>;

    /// Deletes a role with its grants and user assignments.
    ///
    /// Fails with a conflict for system roles.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Copies a role and all of its grants under a new name.
    async fn clone_role(&self, source_role_id: RoleId, name: &str) -> AppResult<Role>;

    /// Lists the permission catalog ordered by resource and action.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Adds a catalog permission. Fails with a conflict when the
    /// (resource, action) pair exists.
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission>;

    /// Deletes a catalog permission and every grant referencing it.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Attaches or updates a grant on a role.
    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        input: GrantPermissionInput,
    ) -> AppResult<RoleGrant>;

    /// Removes a grant from a role.
    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()>;

    /// Replaces every grant on a role with plain grants for the given
    /// permissions.
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Vec<RoleGrant>>;

    /// Assigns a role to a user. Assigning twice is a no-op.
    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Removes a role assignment.
    async fn revoke_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;
}
