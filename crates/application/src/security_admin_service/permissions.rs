use wayfare_domain::{Permission, PermissionId};

use crate::security_admin_ports::CreatePermissionInput;

use super::*;

impl SecurityAdminService {
    /// Lists the permission catalog.
    pub async fn list_permissions(&self, actor: &AuthContext) -> AppResult<Vec<Permission>> {
        self.require(actor, "permissions", Action::Read)?;
        self.repository.list_permissions().await
    }

    /// Adds a catalog permission.
    pub async fn create_permission(
        &self,
        actor: &AuthContext,
        input: CreatePermissionInput,
    ) -> AppResult<Permission> {
        self.require(actor, "permissions", Action::Create)?;
        PermissionKey::parse(&input.resource, &input.action)?;

        let permission = self.repository.create_permission(input).await?;

        self.audit(
            actor,
            AuditAction::PermissionCreated,
            "permission",
            permission.id().to_string(),
            format!("created permission '{}'", permission.key()),
        )
        .await?;

        Ok(permission)
    }

    /// Deletes a catalog permission and every grant referencing it.
    pub async fn delete_permission(
        &self,
        actor: &AuthContext,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.require(actor, "permissions", Action::Delete)?;

        self.repository.delete_permission(permission_id).await?;

        self.audit(
            actor,
            AuditAction::PermissionDeleted,
            "permission",
            permission_id.to_string(),
            format!("deleted permission '{permission_id}'"),
        )
        .await
    }
}
