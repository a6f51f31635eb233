use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_permissions_impl(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource, action, description, category
            FROM permissions
            ORDER BY resource, action
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("list permissions", error))?
        .into_iter()
        .map(PermissionRow::into_permission)
        .collect()
    }

    pub(super) async fn create_permission_impl(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<Permission> {
        let key = wayfare_domain::PermissionKey::parse(&input.resource, &input.action)?;

        sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (resource, action, description, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, resource, action, description, category
            "#,
        )
        .bind(key.resource().as_str())
        .bind(key.action().as_str())
        .bind(input.description.as_str())
        .bind(input.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_store_error(error, "create permission", || {
                format!("permission '{key}' already exists")
            })
        })?
        .into_permission()
    }

    pub(super) async fn delete_permission_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE permission_id = $1")
            .bind(permission_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| store_error("delete permission grants", error))?;

        let rows_affected = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| store_error("delete permission", error))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        commit(transaction).await
    }

    pub(super) async fn grant_permission_to_role_impl(
        &self,
        role_id: RoleId,
        input: GrantPermissionInput,
    ) -> AppResult<RoleGrant> {
        let mut transaction = self.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id, granted, conditions)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (role_id, permission_id) DO UPDATE
            SET granted = EXCLUDED.granted, conditions = EXCLUDED.conditions
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(input.permission_id.as_uuid())
        .bind(input.granted)
        .bind(input.conditions)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_grant_error(error, input.permission_id))?;

        let row = sqlx::query_as::<_, GrantRow>(
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
            WHERE role_permissions.role_id = $1
                AND role_permissions.permission_id = $2
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(input.permission_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| store_error("load role grant", error))?;

        commit(transaction).await?;
        row.into_grant()
    }

    pub(super) async fn revoke_permission_from_role_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1 AND permission_id = $2
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("revoke role grant", error))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' has no grant for permission '{permission_id}'"
            )));
        }

        Ok(())
    }

    pub(super) async fn replace_role_permissions_impl(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Vec<RoleGrant>> {
        let mut transaction = self.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| store_error("clear role grants", error))?;
        insert_grants(&mut transaction, role_id.as_uuid(), &permission_ids).await?;

        let rows = sqlx::query_as::<_, GrantRow>(
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
            WHERE role_permissions.role_id = $1
            ORDER BY permissions.resource, permissions.action
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| store_error("list role grants", error))?;

        commit(transaction).await?;
        rows.into_iter().map(GrantRow::into_grant).collect()
    }
}
