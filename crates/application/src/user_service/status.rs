use super::*;

impl UserService {
    /// Changes an account status. Non-active users fail authentication on
    /// their next request.
    pub async fn set_status(
        &self,
        actor: &AuthContext,
        user_id: UserId,
        status: UserStatus,
    ) -> AppResult<User> {
        let key = PermissionKey::new(ResourceName::new("users")?, Action::Update);
        self.authorization_service.require(actor, &key)?;

        if actor.user().id() == user_id && !status.is_active() {
            return Err(AppError::Validation(
                "users cannot deactivate their own account".to_owned(),
            ));
        }

        let user = self.user_repository.set_status(user_id, status).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject(),
                action: AuditAction::UserStatusChanged,
                resource_type: "user".to_owned(),
                resource_id: user_id.to_string(),
                detail: Some(format!("status set to '{}'", status.as_str())),
            })
            .await?;

        Ok(user)
    }
}
