use std::sync::Arc;

use wayfare_core::{AccessError, AuthFailure};
use wayfare_domain::{Role, User, UserId};

use crate::AccessRepository;

/// Active user together with the roles currently assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Stored user record.
    pub user: User,
    /// Roles assigned through user-role links.
    pub roles: Vec<Role>,
}

/// Maps a verified subject to a stored, active user and its roles.
#[derive(Clone)]
pub struct IdentityResolver {
    repository: Arc<dyn AccessRepository>,
}

impl IdentityResolver {
    /// Creates a resolver over the access store.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Loads the user and its roles.
    ///
    /// Fails with [`AuthFailure::UserNotFound`] or [`AuthFailure::UserInactive`]
    /// before any role lookup happens for such users. The last-seen write runs
    /// on a detached task and never delays or fails resolution.
    pub async fn resolve(&self, user_id: UserId) -> Result<ResolvedIdentity, AccessError> {
        let user = self
            .repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthFailure::UserNotFound)?;

        if !user.status().is_active() {
            return Err(AuthFailure::UserInactive.into());
        }

        let roles = self.repository.list_roles_for_user(user_id).await?;

        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            if let Err(error) = repository.touch_last_seen(user_id).await {
                tracing::warn!(%user_id, error = %error, "failed to record last seen time");
            }
        });

        Ok(ResolvedIdentity { user, roles })
    }
}
