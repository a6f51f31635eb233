use super::*;

impl UserService {
    /// Registers an active account with the default customer role.
    pub async fn register(&self, params: RegisterParams) -> AppResult<User> {
        let email = EmailAddress::new(params.email)?;
        validate_password(&params.password)?;
        let display_name = params.display_name.trim().to_owned();
        if display_name.is_empty() {
            return Err(AppError::Validation(
                "display name must not be empty".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user = self
            .user_repository
            .create_user(NewUser {
                email,
                display_name,
                password_hash,
                primary_role: DEFAULT_PRIMARY_ROLE.to_owned(),
                initial_role: Some(DEFAULT_ROLE_NAME.to_owned()),
            })
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => {
                    AppError::Conflict("registration could not be completed".to_owned())
                }
                other => other,
            })?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: user.id().to_string(),
                action: AuditAction::UserRegistered,
                resource_type: "user".to_owned(),
                resource_id: user.id().to_string(),
                detail: None,
            })
            .await?;

        tracing::info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}
