//! In-memory access store used by `AUTH_STORE=memory` and tests.
//!
//! All tables live behind one lock, so multi-table writes are atomic.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use wayfare_application::{
    AccessRepository, AuditEvent, AuditRepository, NewUser, UserRecord, UserRepository,
};
use wayfare_core::{AppError, AppResult};
use wayfare_domain::{
    Permission, PermissionId, PermissionKey, Role, RoleGrant, RoleId, User, UserId, UserStatus,
};

use crate::seed_catalog::{
    SEED_ACTIONS, SEED_GRANTS, SEED_RESOURCES, SEED_ROLES, seed_description,
};

mod security_admin;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
    last_seen_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct StoredGrant {
    granted: bool,
    conditions: Option<Value>,
}

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, StoredUser>,
    roles: HashMap<RoleId, Role>,
    permissions: HashMap<PermissionId, Permission>,
    grants: HashMap<(RoleId, PermissionId), StoredGrant>,
    user_roles: HashSet<(UserId, RoleId)>,
    audit_events: Vec<AuditEvent>,
}

impl StoreState {
    fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles
            .values()
            .find(|role| role.name().as_str() == name.trim())
    }

    fn permission_by_key(&self, key: &PermissionKey) -> Option<&Permission> {
        self.permissions
            .values()
            .find(|permission| permission.key() == key)
    }

    fn existing_role(&self, role_id: RoleId) -> AppResult<&Role> {
        self.roles
            .get(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    fn existing_permission(&self, permission_id: PermissionId) -> AppResult<&Permission> {
        self.permissions.get(&permission_id).ok_or_else(|| {
            AppError::NotFound(format!("permission '{permission_id}' does not exist"))
        })
    }

    fn grants_for_role(&self, role_id: RoleId) -> Vec<RoleGrant> {
        let mut grants: Vec<RoleGrant> = self
            .grants
            .iter()
            .filter(|((granted_role_id, _), _)| *granted_role_id == role_id)
            .filter_map(|((_, permission_id), stored)| {
                self.permissions
                    .get(permission_id)
                    .map(|permission| RoleGrant {
                        role_id,
                        permission: permission.clone(),
                        granted: stored.granted,
                        conditions: stored.conditions.clone(),
                    })
            })
            .collect();
        grants.sort_by(|left, right| left.permission.key().cmp(right.permission.key()));
        grants
    }
}

/// In-memory implementation of every access-control port.
#[derive(Debug, Default)]
pub struct InMemoryAccessStore {
    state: RwLock<StoreState>,
}

impl InMemoryAccessStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the built-in roles and permission catalog.
    pub fn seeded() -> AppResult<Self> {
        let mut state = StoreState::default();

        for (resource, category) in SEED_RESOURCES {
            for action in SEED_ACTIONS {
                let permission = Permission::new(
                    PermissionId::new(),
                    PermissionKey::parse(resource, action)?,
                    seed_description(resource, action),
                    category,
                );
                state.permissions.insert(permission.id(), permission);
            }
        }

        for (name, description, kind) in SEED_ROLES {
            let role = Role::new(RoleId::new(), name, description, true, kind)?;
            state.roles.insert(role.id(), role);
        }

        for (role_name, resource, action) in SEED_GRANTS {
            let key = PermissionKey::parse(resource, action)?;
            let role_id = state
                .role_by_name(role_name)
                .map(Role::id)
                .ok_or_else(|| AppError::Internal(format!("seed role '{role_name}' missing")))?;
            let permission_id = state
                .permission_by_key(&key)
                .map(Permission::id)
                .ok_or_else(|| AppError::Internal(format!("seed permission '{key}' missing")))?;
            state.grants.insert(
                (role_id, permission_id),
                StoredGrant {
                    granted: true,
                    conditions: None,
                },
            );
        }

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Returns every audit event appended so far.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.read().await.audit_events.clone()
    }

    /// Returns when the user was last resolved, if ever.
    pub async fn last_seen_at(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        self.state
            .read()
            .await
            .users
            .get(&user_id)
            .and_then(|stored| stored.last_seen_at)
    }
}

#[async_trait]
impl AccessRepository for InMemoryAccessStore {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .get(&user_id)
            .map(|stored| stored.user.clone()))
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state
            .user_roles
            .iter()
            .filter(|(assigned_user_id, _)| *assigned_user_id == user_id)
            .filter_map(|(_, role_id)| state.roles.get(role_id).cloned())
            .collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(roles)
    }

    async fn list_permissions_for_role(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .grants_for_role(role_id)
            .into_iter()
            .filter(|grant| grant.granted)
            .map(|grant| grant.permission)
            .collect())
    }

    async fn list_grants_for_role(&self, role_id: RoleId) -> AppResult<Vec<RoleGrant>> {
        Ok(self.state.read().await.grants_for_role(role_id))
    }

    async fn list_grants_for_roles(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleGrant>> {
        let state = self.state.read().await;
        Ok(role_ids
            .iter()
            .flat_map(|role_id| state.grants_for_role(*role_id))
            .collect())
    }

    async fn touch_last_seen(&self, user_id: UserId) -> AppResult<()> {
        if let Some(stored) = self.state.write().await.users.get_mut(&user_id) {
            stored.last_seen_at = Some(Utc::now());
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryAccessStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|stored| stored.user.email().as_str() == email)
            .map(|stored| UserRecord {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        self.find_user_by_id(user_id).await
    }

    async fn create_user(&self, input: NewUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|stored| stored.user.email() == &input.email)
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let user = User::new(
            UserId::new(),
            input.email.as_str(),
            input.display_name,
            input.primary_role,
            UserStatus::Active,
        )?;
        let initial_role_id = input
            .initial_role
            .as_deref()
            .and_then(|name| state.role_by_name(name))
            .map(Role::id);
        match (initial_role_id, input.initial_role.as_deref()) {
            (Some(role_id), _) => {
                state.user_roles.insert((user.id(), role_id));
            }
            (None, Some(role_name)) => {
                tracing::warn!(
                    role = role_name,
                    "initial role missing, account created without roles"
                );
            }
            (None, None) => {}
        }

        state.users.insert(
            user.id(),
            StoredUser {
                user: user.clone(),
                password_hash: input.password_hash,
                last_seen_at: None,
            },
        );

        Ok(user)
    }

    async fn set_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User> {
        let mut state = self.state.write().await;
        let stored = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        stored.user = stored.user.clone().with_status(status);
        Ok(stored.user.clone())
    }
}

#[async_trait]
impl AuditRepository for InMemoryAccessStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.write().await.audit_events.push(event);
        Ok(())
    }
}
