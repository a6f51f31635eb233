use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use wayfare_application::{
    CreatePermissionInput, CreateRoleInput, GrantPermissionInput, SecurityAdminRepository,
    UpdateRoleInput,
};
use wayfare_core::{AppError, AppResult};
use wayfare_domain::{Permission, PermissionId, Role, RoleGrant, RoleId, UserId};

use crate::postgres_rows::{
    GrantRow, PermissionRow, RoleRow, conflict_or_store_error, store_error,
};

mod assignments;
mod permissions;
mod roles;

/// PostgreSQL-backed repository for role and permission administration.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| store_error("begin transaction", error))
    }
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| store_error("commit transaction", error))
}

/// Inserts plain grants, ignoring ones already present.
async fn insert_grants(
    transaction: &mut Transaction<'_, Postgres>,
    role_id: uuid::Uuid,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    for permission_id in permission_ids {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id, granted)
            VALUES ($1, $2, true)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_id.as_uuid())
        .execute(&mut **transaction)
        .await
        .map_err(|error| map_grant_error(error, *permission_id))?;
    }

    Ok(())
}

fn map_grant_error(error: sqlx::Error, permission_id: PermissionId) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!("permission '{permission_id}' does not exist"));
    }

    store_error("persist role grant", error)
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.find_role_impl(role_id).await
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.find_role_by_name_impl(name).await
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        self.create_role_impl(input).await
    }

    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        self.update_role_impl(role_id, input).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }

    async fn clone_role(&self, source_role_id: RoleId, name: &str) -> AppResult<Role> {
        self.clone_role_impl(source_role_id, name).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.list_permissions_impl().await
    }

    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission> {
        self.create_permission_impl(input).await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.delete_permission_impl(permission_id).await
    }

    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        input: GrantPermissionInput,
    ) -> AppResult<RoleGrant> {
        self.grant_permission_to_role_impl(role_id, input).await
    }

    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.revoke_permission_from_role_impl(role_id, permission_id)
            .await
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Vec<RoleGrant>> {
        self.replace_role_permissions_impl(role_id, permission_ids)
            .await
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.assign_role_to_user_impl(user_id, role_id).await
    }

    async fn revoke_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.revoke_role_from_user_impl(user_id, role_id).await
    }
}
