use super::*;

fn role_conflict(name: &str) -> impl FnOnce() -> String + '_ {
    move || format!("role '{name}' already exists")
}

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_system, kind
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("list roles", error))?
        .into_iter()
        .map(RoleRow::into_role)
        .collect()
    }

    pub(super) async fn find_role_impl(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_system, kind
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("find role", error))?
        .map(RoleRow::into_role)
        .transpose()
    }

    pub(super) async fn find_role_by_name_impl(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_system, kind
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("find role by name", error))?
        .map(RoleRow::into_role)
        .transpose()
    }

    pub(super) async fn create_role_impl(&self, input: CreateRoleInput) -> AppResult<Role> {
        let mut transaction = self.begin().await?;

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (name, description, is_system, kind)
            VALUES ($1, $2, false, $3)
            RETURNING id, name, description, is_system, kind
            "#,
        )
        .bind(input.name.trim())
        .bind(input.description.as_str())
        .bind(input.kind.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            conflict_or_store_error(error, "create role", role_conflict(&input.name))
        })?;

        insert_grants(&mut transaction, row.id, &input.permission_ids).await?;
        commit(transaction).await?;

        row.into_role()
    }

    pub(super) async fn update_role_impl(
        &self,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        let mut transaction = self.begin().await?;

        let (current_name, is_system) = sqlx::query_as::<_, (String, bool)>(
            r#"
            SELECT name, is_system
            FROM roles
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error("load role", error))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        if is_system && current_name != input.name.trim() {
            return Err(AppError::Conflict(format!(
                "system role '{current_name}' cannot be renamed"
            )));
        }

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, is_system, kind
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(input.name.trim())
        .bind(input.description.as_str())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            conflict_or_store_error(error, "update role", role_conflict(&input.name))
        })?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        if let Some(permission_ids) = &input.permission_ids {
            sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
                .bind(role_id.as_uuid())
                .execute(&mut *transaction)
                .await
                .map_err(|error| store_error("clear role grants", error))?;
            insert_grants(&mut transaction, row.id, permission_ids).await?;
        }

        commit(transaction).await?;
        row.into_role()
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        let is_system = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_system
            FROM roles
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error("load role", error))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        if is_system {
            return Err(AppError::Conflict(format!(
                "system role '{role_id}' cannot be deleted"
            )));
        }

        for (statement, operation) in [
            (
                "DELETE FROM role_permissions WHERE role_id = $1",
                "delete role grants",
            ),
            (
                "DELETE FROM user_roles WHERE role_id = $1",
                "delete role assignments",
            ),
            ("DELETE FROM roles WHERE id = $1", "delete role"),
        ] {
            sqlx::query(statement)
                .bind(role_id.as_uuid())
                .execute(&mut *transaction)
                .await
                .map_err(|error| store_error(operation, error))?;
        }

        commit(transaction).await
    }

    pub(super) async fn clone_role_impl(
        &self,
        source_role_id: RoleId,
        name: &str,
    ) -> AppResult<Role> {
        let mut transaction = self.begin().await?;

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (name, description, is_system, kind)
            SELECT $2, source.description, false, source.kind
            FROM roles AS source
            WHERE source.id = $1
            RETURNING id, name, description, is_system, kind
            "#,
        )
        .bind(source_role_id.as_uuid())
        .bind(name.trim())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| conflict_or_store_error(error, "clone role", role_conflict(name)))?
        .ok_or_else(|| AppError::NotFound(format!("role '{source_role_id}' does not exist")))?;

        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id, granted, conditions)
            SELECT $2, permission_id, granted, conditions
            FROM role_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(source_role_id.as_uuid())
        .bind(row.id)
        .execute(&mut *transaction)
        .await
        .map_err(|error| store_error("copy role grants", error))?;

        commit(transaction).await?;
        row.into_role()
    }
}
