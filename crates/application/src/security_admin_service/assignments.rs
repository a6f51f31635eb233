use super::*;

impl SecurityAdminService {
    /// Lists roles assigned to a user.
    pub async fn list_user_roles(
        &self,
        actor: &AuthContext,
        user_id: UserId,
    ) -> AppResult<Vec<Role>> {
        self.require(actor, "users", Action::Read)?;

        self.ensure_user_exists(user_id).await?;
        self.access_repository.list_roles_for_user(user_id).await
    }

    /// Assigns a role to a user and emits an audit event.
    pub async fn assign_role(
        &self,
        actor: &AuthContext,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.require(actor, "users", Action::Update)?;

        self.ensure_user_exists(user_id).await?;
        let role = self.existing_role(role_id).await?;
        self.guard_superuser_name(actor, role.name().as_str())?;
        self.repository.assign_role_to_user(user_id, role_id).await?;

        self.audit(
            actor,
            AuditAction::UserRoleAssigned,
            "user_role",
            format!("{user_id}:{role_id}"),
            format!("assigned role '{}' to user '{user_id}'", role.name()),
        )
        .await
    }

    /// Removes a role assignment and emits an audit event.
    pub async fn revoke_role(
        &self,
        actor: &AuthContext,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.require(actor, "users", Action::Update)?;

        let role = self.existing_role(role_id).await?;
        self.guard_superuser_name(actor, role.name().as_str())?;
        self.repository.revoke_role_from_user(user_id, role_id).await?;

        self.audit(
            actor,
            AuditAction::UserRoleRevoked,
            "user_role",
            format!("{user_id}:{role_id}"),
            format!("revoked role '{}' from user '{user_id}'", role.name()),
        )
        .await
    }
}
