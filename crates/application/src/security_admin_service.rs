//! Role, permission and assignment administration.
//!
//! Every use-case authorizes the acting [`AuthContext`] first and appends an
//! audit event after a successful mutation.

use std::sync::Arc;

use wayfare_core::{AppError, AppResult};
use wayfare_domain::{Action, AuditAction, PermissionKey, ResourceName, Role, RoleId, UserId};

use crate::{
    AccessRepository, AuditEvent, AuditRepository, AuthContext, AuthorizationService,
    SecurityAdminRepository,
};

mod assignments;
mod permissions;
mod roles;

/// Application service for security administration workflows.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SecurityAdminRepository>,
    access_repository: Arc<dyn AccessRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SecurityAdminRepository>,
        access_repository: Arc<dyn AccessRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            access_repository,
            audit_repository,
        }
    }

    fn require(&self, actor: &AuthContext, resource: &str, action: Action) -> AppResult<()> {
        let key = PermissionKey::new(ResourceName::new(resource)?, action);
        self.authorization_service.require(actor, &key)
    }

    /// Superuser role names bypass every permission check, so only a
    /// superuser may create, rename, delete, assign or revoke them.
    fn guard_superuser_name(&self, actor: &AuthContext, name: &str) -> AppResult<()> {
        if self.authorization_service.is_superuser_role_name(name)
            && !self.authorization_service.is_superuser(actor)
        {
            return Err(AppError::Forbidden(format!(
                "only superusers may manage role '{name}'"
            )));
        }

        Ok(())
    }

    async fn existing_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn ensure_user_exists(&self, user_id: UserId) -> AppResult<()> {
        self.access_repository
            .find_user_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    async fn audit(
        &self,
        actor: &AuthContext,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}

#[cfg(test)]
mod tests;
