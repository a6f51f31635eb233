use wayfare_core::NonEmptyString;
use wayfare_domain::{PermissionId, RoleGrant};

use crate::security_admin_ports::{
    CreateRoleInput, GrantPermissionInput, RoleDetails, UpdateRoleInput,
};

use super::*;

fn role_name(value: &str) -> AppResult<String> {
    NonEmptyString::new(value.trim()).map(String::from)
}

impl SecurityAdminService {
    /// Lists every role.
    pub async fn list_roles(&self, actor: &AuthContext) -> AppResult<Vec<Role>> {
        self.require(actor, "roles", Action::Read)?;
        self.repository.list_roles().await
    }

    /// Returns one role with its grants and denials.
    pub async fn get_role(&self, actor: &AuthContext, role_id: RoleId) -> AppResult<RoleDetails> {
        self.require(actor, "roles", Action::Read)?;

        let role = self.existing_role(role_id).await?;
        let grants = self.access_repository.list_grants_for_role(role_id).await?;
        Ok(RoleDetails { role, grants })
    }

    /// Lists grants and denials attached to a role.
    pub async fn list_role_permissions(
        &self,
        actor: &AuthContext,
        role_id: RoleId,
    ) -> AppResult<Vec<RoleGrant>> {
        self.require(actor, "roles", Action::Read)?;

        self.existing_role(role_id).await?;
        self.access_repository.list_grants_for_role(role_id).await
    }

    /// Creates a custom role and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &AuthContext,
        mut input: CreateRoleInput,
    ) -> AppResult<Role> {
        self.require(actor, "roles", Action::Create)?;
        input.name = role_name(&input.name)?;
        self.guard_superuser_name(actor, &input.name)?;

        let role = self.repository.create_role(input).await?;

        self.audit(
            actor,
            AuditAction::RoleCreated,
            "role",
            role.id().to_string(),
            format!("created role '{}'", role.name()),
        )
        .await?;

        Ok(role)
    }

    /// Renames a role and optionally replaces its grants.
    pub async fn update_role(
        &self,
        actor: &AuthContext,
        role_id: RoleId,
        mut input: UpdateRoleInput,
    ) -> AppResult<Role> {
        self.require(actor, "roles", Action::Update)?;
        input.name = role_name(&input.name)?;

        let current = self.existing_role(role_id).await?;
        self.guard_superuser_name(actor, current.name().as_str())?;
        self.guard_superuser_name(actor, &input.name)?;
        if current.is_system() && current.name().as_str() != input.name {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be renamed",
                current.name()
            )));
        }

        let replaced = input.permission_ids.as_ref().map(Vec::len);
        let role = self.repository.update_role(role_id, input).await?;

        let detail = match replaced {
            Some(count) => format!("updated role '{}' with {count} grants", role.name()),
            None => format!("updated role '{}'", role.name()),
        };
        self.audit(
            actor,
            AuditAction::RoleUpdated,
            "role",
            role_id.to_string(),
            detail,
        )
        .await?;

        Ok(role)
    }

    /// Deletes a custom role with its grants and assignments.
    pub async fn delete_role(&self, actor: &AuthContext, role_id: RoleId) -> AppResult<()> {
        self.require(actor, "roles", Action::Delete)?;

        let role = self.existing_role(role_id).await?;
        self.guard_superuser_name(actor, role.name().as_str())?;
        if role.is_system() {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be deleted",
                role.name()
            )));
        }

        self.repository.delete_role(role_id).await?;

        self.audit(
            actor,
            AuditAction::RoleDeleted,
            "role",
            role_id.to_string(),
            format!("deleted role '{}'", role.name()),
        )
        .await
    }

    /// Copies a role and its grants under a new name.
    pub async fn clone_role(
        &self,
        actor: &AuthContext,
        source_role_id: RoleId,
        name: &str,
    ) -> AppResult<Role> {
        self.require(actor, "roles", Action::Create)?;
        let name = role_name(name)?;
        self.guard_superuser_name(actor, &name)?;

        let source = self.existing_role(source_role_id).await?;
        let role = self.repository.clone_role(source_role_id, &name).await?;

        self.audit(
            actor,
            AuditAction::RoleCloned,
            "role",
            role.id().to_string(),
            format!("cloned role '{}' from '{}'", role.name(), source.name()),
        )
        .await?;

        Ok(role)
    }

    /// Attaches a grant or an explicit denial to a role.
    pub async fn grant_permission(
        &self,
        actor: &AuthContext,
        role_id: RoleId,
        input: GrantPermissionInput,
    ) -> AppResult<RoleGrant> {
        self.require(actor, "roles", Action::Update)?;

        let role = self.existing_role(role_id).await?;
        let grant = self
            .repository
            .grant_permission_to_role(role_id, input)
            .await?;

        let verb = if grant.granted { "granted" } else { "denied" };
        self.audit(
            actor,
            AuditAction::RolePermissionGranted,
            "role_permission",
            format!("{role_id}:{}", grant.permission.id()),
            format!(
                "{verb} '{}' on role '{}'",
                grant.permission.key(),
                role.name()
            ),
        )
        .await?;

        Ok(grant)
    }

    /// Removes a grant from a role.
    pub async fn revoke_permission(
        &self,
        actor: &AuthContext,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.require(actor, "roles", Action::Update)?;

        let role = self.existing_role(role_id).await?;
        self.repository
            .revoke_permission_from_role(role_id, permission_id)
            .await?;

        self.audit(
            actor,
            AuditAction::RolePermissionRevoked,
            "role_permission",
            format!("{role_id}:{permission_id}"),
            format!("revoked permission '{permission_id}' from role '{}'", role.name()),
        )
        .await
    }

    /// Replaces every grant on a role.
    pub async fn replace_role_permissions(
        &self,
        actor: &AuthContext,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Vec<RoleGrant>> {
        self.require(actor, "roles", Action::Update)?;

        let role = self.existing_role(role_id).await?;
        let grants = self
            .repository
            .replace_role_permissions(role_id, permission_ids)
            .await?;

        self.audit(
            actor,
            AuditAction::RoleUpdated,
            "role",
            role_id.to_string(),
            format!(
                "replaced permissions of role '{}' with {} grants",
                role.name(),
                grants.len()
            ),
        )
        .await?;

        Ok(grants)
    }
}
