use super::*;

impl UserService {
    /// Authenticates a user with email and password.
    ///
    /// Unknown email, wrong password and non-active accounts all return
    /// [`LoginOutcome::Failed`]. A hash is computed on every path.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let email = email.trim().to_lowercase();
        let record = self.user_repository.find_by_email(&email).await?;

        let Some(record) = record else {
            let _ = self.password_hasher.hash_password(password);
            tracing::debug!(reason = "unknown_email", "login failed");
            return Ok(LoginOutcome::Failed);
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &record.password_hash)?;
        if !password_valid {
            tracing::debug!(
                user_id = %record.user.id(),
                reason = "invalid_password",
                "login failed"
            );
            return Ok(LoginOutcome::Failed);
        }

        if !record.user.status().is_active() {
            tracing::debug!(
                user_id = %record.user.id(),
                reason = "user_inactive",
                "login failed"
            );
            return Ok(LoginOutcome::Failed);
        }

        let credential = self.credential_issuer.issue(&record.user)?;
        tracing::info!(user_id = %record.user.id(), "user logged in");

        Ok(LoginOutcome::Authenticated {
            user: record.user,
            credential,
        })
    }
}
