//! Startup provisioning of the configured bootstrap administrator.

use tracing::info;
use wayfare_application::{NewUser, PasswordHasher};
use wayfare_core::{AppError, AppResult};
use wayfare_domain::{EmailAddress, validate_password};
use wayfare_infrastructure::Argon2PasswordHasher;

use crate::api_config::BootstrapAdminConfig;
use crate::api_services::RepositorySet;

const BOOTSTRAP_ADMIN_ROLE: &str = "Admin";
const BOOTSTRAP_PRIMARY_ROLE: &str = "admin";

/// Ensures the bootstrap account exists and holds the `Admin` role.
///
/// An existing account keeps its password; only the role assignment is
/// reconciled.
pub async fn ensure_bootstrap_admin(
    repositories: &RepositorySet,
    admin: &BootstrapAdminConfig,
) -> AppResult<()> {
    let email = EmailAddress::new(admin.email.as_str())?;

    let role = repositories
        .security_admin_repository
        .find_role_by_name(BOOTSTRAP_ADMIN_ROLE)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "role '{BOOTSTRAP_ADMIN_ROLE}' is missing from the role catalog"
            ))
        })?;

    let user = match repositories
        .user_repository
        .find_by_email(email.as_str())
        .await?
    {
        Some(record) => record.user,
        None => {
            validate_password(&admin.password)?;
            let password_hash = Argon2PasswordHasher::new()?.hash_password(&admin.password)?;
            let user = repositories
                .user_repository
                .create_user(NewUser {
                    email,
                    display_name: admin.display_name.clone(),
                    password_hash,
                    primary_role: BOOTSTRAP_PRIMARY_ROLE.to_owned(),
                    initial_role: None,
                })
                .await?;
            info!(user_id = %user.id(), "bootstrap admin created");
            user
        }
    };

    repositories
        .security_admin_repository
        .assign_role_to_user(user.id(), role.id())
        .await?;

    info!(user_id = %user.id(), role = BOOTSTRAP_ADMIN_ROLE, "bootstrap admin ready");
    Ok(())
}
