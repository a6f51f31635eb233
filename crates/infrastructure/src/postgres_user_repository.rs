//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use wayfare_application::{NewUser, UserRecord, UserRepository};
use wayfare_core::{AppError, AppResult};
use wayfare_domain::{User, UserId, UserStatus};

use crate::postgres_rows::{UserRow, conflict_or_store_error, store_error};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

fn email_conflict() -> String {
    "an account with this email already exists".to_owned()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, email, display_name, primary_role, status, password_hash
            FROM users
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("find user by email", error))?
        .map(|row| {
            Ok(UserRecord {
                user: row.user.into_user()?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
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

    async fn create_user(&self, input: NewUser) -> AppResult<User> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| store_error("begin transaction", error))?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, display_name, password_hash, primary_role, status)
            VALUES (LOWER($1), $2, $3, $4, 'active')
            RETURNING id, email, display_name, primary_role, status
            "#,
        )
        .bind(input.email.as_str())
        .bind(input.display_name.as_str())
        .bind(input.password_hash.as_str())
        .bind(input.primary_role.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| conflict_or_store_error(error, "create user", email_conflict))?;

        if let Some(role_name) = input.initial_role.as_deref() {
            let assigned = sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_id)
                SELECT $1, id
                FROM roles
                WHERE name = $2
                ON CONFLICT (user_id, role_id) DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(role_name)
            .execute(&mut *transaction)
            .await
            .map_err(|error| store_error("assign initial role", error))?;

            if assigned.rows_affected() == 0 {
                tracing::warn!(
                    role = role_name,
                    "initial role missing, account created without roles"
                );
            }
        }

        transaction
            .commit()
            .await
            .map_err(|error| store_error("commit transaction", error))?;

        row.into_user()
    }

    async fn set_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, email, display_name, primary_role, status
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("update user status", error))?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?
        .into_user()
    }
}
