use wayfare_application::{
    CreatePermissionInput, CreateRoleInput, GrantPermissionInput, SecurityAdminRepository,
    UpdateRoleInput,
};

use super::*;

fn ensure_unique_name(state: &StoreState, name: &str, except: Option<RoleId>) -> AppResult<()> {
    match state.role_by_name(name) {
        Some(role) if Some(role.id()) != except => Err(AppError::Conflict(format!(
            "role '{}' already exists",
            name.trim()
        ))),
        _ => Ok(()),
    }
}

fn plain_grants(
    state: &StoreState,
    permission_ids: &[PermissionId],
) -> AppResult<Vec<PermissionId>> {
    for permission_id in permission_ids {
        state.existing_permission(*permission_id)?;
    }

    Ok(permission_ids.to_vec())
}

fn insert_plain_grants(
    state: &mut StoreState,
    role_id: RoleId,
    permission_ids: Vec<PermissionId>,
) {
    for permission_id in permission_ids {
        state.grants.entry((role_id, permission_id)).or_insert(StoredGrant {
            granted: true,
            conditions: None,
        });
    }
}

#[async_trait]
impl SecurityAdminRepository for InMemoryAccessStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.role_by_name(name).cloned())
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let mut state = self.state.write().await;
        ensure_unique_name(&state, &input.name, None)?;
        let permission_ids = plain_grants(&state, &input.permission_ids)?;

        let role = Role::new(RoleId::new(), input.name, input.description, false, input.kind)?;
        insert_plain_grants(&mut state, role.id(), permission_ids);
        state.roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let mut state = self.state.write().await;
        let current = state.existing_role(role_id)?.clone();
        if current.is_system() && current.name().as_str() != input.name.trim() {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be renamed",
                current.name()
            )));
        }
        ensure_unique_name(&state, &input.name, Some(role_id))?;
        let replacement = input
            .permission_ids
            .as_deref()
            .map(|permission_ids| plain_grants(&state, permission_ids))
            .transpose()?;

        let role = Role::new(
            role_id,
            input.name,
            input.description,
            current.is_system(),
            current.kind(),
        )?;
        if let Some(permission_ids) = replacement {
            state.grants.retain(|(granted_role_id, _), _| *granted_role_id != role_id);
            insert_plain_grants(&mut state, role_id, permission_ids);
        }
        state.roles.insert(role_id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let role = state.existing_role(role_id)?;
        if role.is_system() {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be deleted",
                role.name()
            )));
        }

        state.grants.retain(|(granted_role_id, _), _| *granted_role_id != role_id);
        state
            .user_roles
            .retain(|(_, assigned_role_id)| *assigned_role_id != role_id);
        state.roles.remove(&role_id);
        Ok(())
    }

    async fn clone_role(&self, source_role_id: RoleId, name: &str) -> AppResult<Role> {
        let mut state = self.state.write().await;
        let source = state.existing_role(source_role_id)?.clone();
        ensure_unique_name(&state, name, None)?;

        let role = Role::new(
            RoleId::new(),
            name,
            source.description(),
            false,
            source.kind(),
        )?;
        let copied: Vec<(PermissionId, StoredGrant)> = state
            .grants
            .iter()
            .filter(|((granted_role_id, _), _)| *granted_role_id == source_role_id)
            .map(|((_, permission_id), stored)| (*permission_id, stored.clone()))
            .collect();
        for (permission_id, stored) in copied {
            state.grants.insert((role.id(), permission_id), stored);
        }
        state.roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let mut permissions: Vec<Permission> = state.permissions.values().cloned().collect();
        permissions.sort_by(|left, right| left.key().cmp(right.key()));
        Ok(permissions)
    }

    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission> {
        let key = PermissionKey::parse(&input.resource, &input.action)?;
        let mut state = self.state.write().await;
        if state.permission_by_key(&key).is_some() {
            return Err(AppError::Conflict(format!(
                "permission '{key}' already exists"
            )));
        }

        let permission = Permission::new(
            PermissionId::new(),
            key,
            input.description,
            input.category,
        );
        state
            .permissions
            .insert(permission.id(), permission.clone());
        Ok(permission)
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.existing_permission(permission_id)?;

        state
            .grants
            .retain(|(_, granted_permission_id), _| *granted_permission_id != permission_id);
        state.permissions.remove(&permission_id);
        Ok(())
    }

    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        input: GrantPermissionInput,
    ) -> AppResult<RoleGrant> {
        let mut state = self.state.write().await;
        state.existing_role(role_id)?;
        let permission = state.existing_permission(input.permission_id)?.clone();

        state.grants.insert(
            (role_id, input.permission_id),
            StoredGrant {
                granted: input.granted,
                conditions: input.conditions.clone(),
            },
        );

        Ok(RoleGrant {
            role_id,
            permission,
            granted: input.granted,
            conditions: input.conditions,
        })
    }

    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.state
            .write()
            .await
            .grants
            .remove(&(role_id, permission_id))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "role '{role_id}' has no grant for permission '{permission_id}'"
                ))
            })
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Vec<RoleGrant>> {
        let mut state = self.state.write().await;
        state.existing_role(role_id)?;
        let permission_ids = plain_grants(&state, &permission_ids)?;

        state.grants.retain(|(granted_role_id, _), _| *granted_role_id != role_id);
        insert_plain_grants(&mut state, role_id, permission_ids);
        Ok(state.grants_for_role(role_id))
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }
        state.existing_role(role_id)?;

        state.user_roles.insert((user_id, role_id));
        Ok(())
    }

    async fn revoke_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        if self.state.write().await.user_roles.remove(&(user_id, role_id)) {
            return Ok(());
        }

        Err(AppError::NotFound(format!(
            "user '{user_id}' does not hold role '{role_id}'"
        )))
    }
}
