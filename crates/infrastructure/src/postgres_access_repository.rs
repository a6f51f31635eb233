use async_trait::async_trait;
use sqlx::PgPool;

use wayfare_application::AccessRepository;
use wayfare_core::AppResult;
use wayfare_domain::{Permission, Role, RoleGrant, RoleId, User, UserId};

use crate::postgres_rows::{GrantRow, RoleRow, UserRow, store_error};

/// PostgreSQL-backed read side used on every authorized request.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRepository for PostgresAccessRepository {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, primary_role, status
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("find user", error))?
        .map(UserRow::into_user)
        .transpose()
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT roles.id, roles.name, roles.description, roles.is_system, roles.kind
            FROM user_roles
            INNER JOIN roles ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("list user roles", error))?
        .into_iter()
        .map(RoleRow::into_role)
        .collect()
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
        self.list_grants_for_roles(&[role_id]).await
    }

    async fn list_grants_for_roles(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleGrant>> {
        let role_ids: Vec<uuid::Uuid> = role_ids.iter().map(RoleId::as_uuid).collect();

        sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                role_permissions.role_id,
                role_permissions.granted,
                role_permissions.conditions,
                permissions.id,
                permissions.resource,
                permissions.action,
                permissions.description,
                permissions.category
            FROM role_permissions
            INNER JOIN permissions ON permissions.id = role_permissions.permission_id
            WHERE role_permissions.role_id = ANY($1)
            ORDER BY permissions.resource, permissions.action
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("list role grants", error))?
        .into_iter()
        .map(GrantRow::into_grant)
        .collect()
    }

    async fn touch_last_seen(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("record last seen time", error))?;

        Ok(())
    }
}
