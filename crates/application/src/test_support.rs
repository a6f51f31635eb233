//! In-process fakes shared by service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use wayfare_core::{AppError, AppResult, AuthFailure};
use wayfare_domain::{
    Permission, PermissionId, PermissionKey, Role, RoleGrant, RoleId, RoleKind, User, UserId,
    UserStatus,
};

use crate::security_admin_ports::{
    CreatePermissionInput, CreateRoleInput, GrantPermissionInput, SecurityAdminRepository,
    UpdateRoleInput,
};
use crate::user_service::{NewUser, UserRecord, UserRepository};
use crate::{
    AccessRepository, AuditEvent, AuditRepository, CredentialIssuer, CredentialVerifier,
    IssuedCredential, SubjectClaim,
};

#[derive(Default)]
struct FakeState {
    users: HashMap<UserId, User>,
    password_hashes: HashMap<UserId, String>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    grants: Vec<RoleGrant>,
    assignments: Vec<(UserId, RoleId)>,
    touched: Vec<UserId>,
    reads: usize,
    fail_touch: bool,
    stall_touch: bool,
    fail_reads: bool,
}

impl FakeState {
    fn role_id(&self, name: &str) -> Option<RoleId> {
        self.roles
            .iter()
            .find(|role| role.name().as_str() == name)
            .map(Role::id)
    }

    fn ensure_role(&mut self, name: &str, is_system: bool) -> RoleId {
        if let Some(role_id) = self.role_id(name) {
            return role_id;
        }

        let role = Role::new(RoleId::new(), name, "", is_system, RoleKind::Administrative)
            .unwrap_or_else(|_| panic!("test role"));
        let role_id = role.id();
        self.roles.push(role);
        role_id
    }

    fn ensure_permission(&mut self, key: PermissionKey) -> Permission {
        if let Some(permission) = self
            .permissions
            .iter()
            .find(|permission| permission.key() == &key)
        {
            return permission.clone();
        }

        let permission = Permission::new(PermissionId::new(), key, "", "test");
        self.permissions.push(permission.clone());
        permission
    }

    fn permission(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.permissions
            .iter()
            .find(|permission| permission.id() == permission_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("permission '{permission_id}'")))
    }

    fn check_reads(&mut self) -> AppResult<()> {
        self.reads += 1;
        if self.fail_reads {
            return Err(AppError::Unavailable("store offline".to_owned()));
        }

        Ok(())
    }
}

/// One in-memory store implementing every repository port.
#[derive(Default)]
pub struct FakeAccessStore {
    state: Mutex<FakeState>,
}

impl FakeAccessStore {
    pub async fn add_user(&self, email: &str, status: UserStatus) -> UserId {
        let user = User::new(UserId::new(), email, "Test User", "customer", status)
            .unwrap_or_else(|_| panic!("test user"));
        let user_id = user.id();
        self.state.lock().await.users.insert(user_id, user);
        user_id
    }

    pub async fn add_system_role(&self, name: &str) -> RoleId {
        self.state.lock().await.ensure_role(name, true)
    }

    pub async fn role_id(&self, name: &str) -> RoleId {
        self.state.lock().await.ensure_role(name, false)
    }

    pub async fn add_permission(&self, label: &str) -> Permission {
        let key = label.parse().unwrap_or_else(|_| panic!("test key"));
        self.state.lock().await.ensure_permission(key)
    }

    pub async fn grant(&self, role_name: &str, label: &str, granted: bool) {
        let key: PermissionKey = label.parse().unwrap_or_else(|_| panic!("test key"));
        let mut state = self.state.lock().await;
        let role_id = state.ensure_role(role_name, false);
        let permission = state.ensure_permission(key);
        state.grants.push(RoleGrant {
            role_id,
            permission,
            granted,
            conditions: None,
        });
    }

    pub async fn assign(&self, user_id: UserId, role_name: &str) {
        let mut state = self.state.lock().await;
        let role_id = state.ensure_role(role_name, false);
        state.assignments.push((user_id, role_id));
    }

    pub async fn set_user_status(&self, user_id: UserId, status: UserStatus) {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.remove(&user_id) {
            state.users.insert(user_id, user.with_status(status));
        }
    }

    pub async fn touched(&self) -> Vec<UserId> {
        self.state.lock().await.touched.clone()
    }

    pub async fn read_count(&self) -> usize {
        self.state.lock().await.reads
    }

    pub async fn fail_touch(&self) {
        self.state.lock().await.fail_touch = true;
    }

    pub async fn stall_touch(&self) {
        self.state.lock().await.stall_touch = true;
    }

    pub async fn fail_reads(&self) {
        self.state.lock().await.fail_reads = true;
    }

    pub async fn grant_count(&self) -> usize {
        self.state.lock().await.grants.len()
    }

    pub async fn assignment_count(&self) -> usize {
        self.state.lock().await.assignments.len()
    }
}

#[async_trait]
impl AccessRepository for FakeAccessStore {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        let mut state = self.state.lock().await;
        state.check_reads()?;
        Ok(state.users.get(&user_id).cloned())
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let mut state = self.state.lock().await;
        state.check_reads()?;
        Ok(state
            .roles
            .iter()
            .filter(|role| state.assignments.contains(&(user_id, role.id())))
            .cloned()
            .collect())
    }

    async fn list_permissions_for_role(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        Ok(self
            .list_grants_for_role(role_id)
            .await?
            .into_iter()
            .filter(|grant| grant.granted)
            .map(|grant| grant.permission)
            .collect())
    }

    async fn list_grants_for_role(&self, role_id: RoleId) -> AppResult<Vec<RoleGrant>> {
        let mut state = self.state.lock().await;
        state.check_reads()?;
        Ok(state
            .grants
            .iter()
            .filter(|grant| grant.role_id == role_id)
            .cloned()
            .collect())
    }

    async fn touch_last_seen(&self, user_id: UserId) -> AppResult<()> {
        let stalled = self.state.lock().await.stall_touch;
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.lock().await;
        if state.fail_touch {
            return Err(AppError::Unavailable("store offline".to_owned()));
        }

        state.touched.push(user_id);
        Ok(())
    }
}

#[async_trait]
impl SecurityAdminRepository for FakeAccessStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.state.lock().await.roles.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|role| role.id() == role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .find(|role| role.name().as_str() == name)
            .cloned())
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        if state.role_id(input.name.trim()).is_some() {
            return Err(AppError::Conflict(format!("role '{}' exists", input.name)));
        }

        let role = Role::new(RoleId::new(), input.name, input.description, false, input.kind)?;
        for permission_id in input.permission_ids {
            let permission = state.permission(permission_id)?;
            state.grants.push(RoleGrant {
                role_id: role.id(),
                permission,
                granted: true,
                conditions: None,
            });
        }
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        let position = state
            .roles
            .iter()
            .position(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}'")))?;
        let current = state.roles[position].clone();
        let role = Role::new(
            role_id,
            input.name,
            input.description,
            current.is_system(),
            current.kind(),
        )?;
        state.roles[position] = role.clone();

        if let Some(permission_ids) = input.permission_ids {
            state.grants.retain(|grant| grant.role_id != role_id);
            for permission_id in permission_ids {
                let permission = state.permission(permission_id)?;
                state.grants.push(RoleGrant {
                    role_id,
                    permission,
                    granted: true,
                    conditions: None,
                });
            }
        }

        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let role = state
            .roles
            .iter()
            .find(|role| role.id() == role_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}'")))?;
        if role.is_system() {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be deleted",
                role.name()
            )));
        }

        state.grants.retain(|grant| grant.role_id != role_id);
        state
            .assignments
            .retain(|(_, assigned_role_id)| *assigned_role_id != role_id);
        state.roles.retain(|role| role.id() != role_id);
        Ok(())
    }

    async fn clone_role(&self, source_role_id: RoleId, name: &str) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        let source = state
            .roles
            .iter()
            .find(|role| role.id() == source_role_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("role '{source_role_id}'")))?;
        let role = Role::new(RoleId::new(), name, source.description(), false, source.kind())?;
        let copied: Vec<RoleGrant> = state
            .grants
            .iter()
            .filter(|grant| grant.role_id == source_role_id)
            .map(|grant| RoleGrant {
                role_id: role.id(),
                ..grant.clone()
            })
            .collect();
        state.grants.extend(copied);
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.state.lock().await.permissions.clone())
    }

    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission> {
        let key = PermissionKey::parse(&input.resource, &input.action)?;
        let mut state = self.state.lock().await;
        if state
            .permissions
            .iter()
            .any(|permission| permission.key() == &key)
        {
            return Err(AppError::Conflict(format!("permission '{key}' exists")));
        }

        let permission = Permission::new(
            PermissionId::new(),
            key,
            input.description,
            input.category,
        );
        state.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.permission(permission_id)?;
        state
            .grants
            .retain(|grant| grant.permission.id() != permission_id);
        state
            .permissions
            .retain(|permission| permission.id() != permission_id);
        Ok(())
    }

    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        input: GrantPermissionInput,
    ) -> AppResult<RoleGrant> {
        let mut state = self.state.lock().await;
        let permission = state.permission(input.permission_id)?;
        state.grants.retain(|grant| {
            !(grant.role_id == role_id && grant.permission.id() == input.permission_id)
        });
        let grant = RoleGrant {
            role_id,
            permission,
            granted: input.granted,
            conditions: input.conditions,
        };
        state.grants.push(grant.clone());
        Ok(grant)
    }

    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .grants
            .retain(|grant| !(grant.role_id == role_id && grant.permission.id() == permission_id));
        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Vec<RoleGrant>> {
        let mut state = self.state.lock().await;
        let mut grants = Vec::with_capacity(permission_ids.len());
        for permission_id in permission_ids {
            grants.push(RoleGrant {
                role_id,
                permission: state.permission(permission_id)?,
                granted: true,
                conditions: None,
            });
        }
        state.grants.retain(|grant| grant.role_id != role_id);
        state.grants.extend(grants.iter().cloned());
        Ok(grants)
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.assignments.contains(&(user_id, role_id)) {
            state.assignments.push((user_id, role_id));
        }
        Ok(())
    }

    async fn revoke_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .assignments
            .retain(|assignment| *assignment != (user_id, role_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeAccessStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|user| user.email().as_str() == email)
            .map(|user| UserRecord {
                user: user.clone(),
                password_hash: state
                    .password_hashes
                    .get(&user.id())
                    .cloned()
                    .unwrap_or_default(),
            }))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn create_user(&self, input: NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|user| user.email() == &input.email)
        {
            return Err(AppError::Conflict("email already registered".to_owned()));
        }

        let user = User::new(
            UserId::new(),
            input.email.as_str(),
            input.display_name,
            input.primary_role,
            UserStatus::Active,
        )?;
        state.users.insert(user.id(), user.clone());
        state.password_hashes.insert(user.id(), input.password_hash);
        if let Some(role_id) = input
            .initial_role
            .as_deref()
            .and_then(|name| state.role_id(name))
        {
            state.assignments.push((user.id(), role_id));
        }

        Ok(user)
    }

    async fn set_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .remove(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}'")))?
            .with_status(status);
        state.users.insert(user_id, user.clone());
        Ok(user)
    }
}

/// Records audit events in memory.
#[derive(Default)]
pub struct FakeAuditRepository {
    pub events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Accepts tokens of the form `user:<uuid>`; `expired` and anything else fail.
pub struct FakeCredentials;

impl CredentialVerifier for FakeCredentials {
    fn verify(&self, credential: &str) -> Result<SubjectClaim, AuthFailure> {
        let subject = credential
            .strip_prefix("user:")
            .and_then(|value| value.parse::<UserId>().ok())
            .ok_or(AuthFailure::InvalidCredential)?;
        let issued_at = Utc::now();

        Ok(SubjectClaim {
            subject,
            issued_at,
            expires_at: issued_at + Duration::hours(1),
            advisory_role: Some("Admin".to_owned()),
        })
    }
}

impl CredentialIssuer for FakeCredentials {
    fn issue(&self, user: &User) -> AppResult<IssuedCredential> {
        Ok(IssuedCredential {
            token: format!("user:{}", user.id()),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }
}

/// Bearer token accepted by [`FakeCredentials`].
pub fn token_for(user_id: UserId) -> String {
    format!("user:{user_id}")
}
