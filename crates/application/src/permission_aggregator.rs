use std::sync::Arc;

use wayfare_core::AppResult;
use wayfare_domain::{PermissionSet, Role, RoleId};

use crate::AccessRepository;

/// Builds the effective permission set for a list of held roles.
#[derive(Clone)]
pub struct PermissionAggregator {
    repository: Arc<dyn AccessRepository>,
}

impl PermissionAggregator {
    /// Creates an aggregator over the access store.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Fetches grants for every role and folds them into one set.
    ///
    /// Always reads the store, so grant edits apply to the next call.
    pub async fn aggregate(&self, roles: &[Role]) -> AppResult<PermissionSet> {
        if roles.is_empty() {
            return Ok(PermissionSet::empty());
        }

        let role_ids: Vec<RoleId> = roles.iter().map(Role::id).collect();
        let grants = self.repository.list_grants_for_roles(&role_ids).await?;

        Ok(PermissionSet::aggregate(&grants))
    }
}
