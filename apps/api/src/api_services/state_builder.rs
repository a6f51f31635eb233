use std::sync::Arc;

use chrono::Duration;
use wayfare_application::{
    AuthorizationService, PasswordHasher, SecurityAdminService, UserService,
};
use wayfare_core::AppError;
use wayfare_domain::DecisionEngine;
use wayfare_infrastructure::{Argon2PasswordHasher, JwtCredentialService};

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod repositories;

pub use repositories::RepositorySet;

pub fn build_app_state(
    repositories: &RepositorySet,
    config: &ApiConfig,
) -> Result<AppState, AppError> {
    let ttl = Duration::try_minutes(config.jwt_ttl_minutes).ok_or_else(|| {
        AppError::Validation(format!(
            "JWT_TTL_MINUTES {} is out of range",
            config.jwt_ttl_minutes
        ))
    })?;
    let credentials = Arc::new(JwtCredentialService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
        ttl,
    )?);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new()?);

    let authorization_service = AuthorizationService::new(
        credentials.clone(),
        repositories.access_repository.clone(),
        DecisionEngine::new(config.superuser_roles.iter().cloned()),
    );

    Ok(AppState {
        security_admin_service: SecurityAdminService::new(
            authorization_service.clone(),
            repositories.security_admin_repository.clone(),
            repositories.access_repository.clone(),
            repositories.audit_repository.clone(),
        ),
        user_service: UserService::new(
            repositories.user_repository.clone(),
            password_hasher,
            credentials,
            authorization_service.clone(),
            repositories.audit_repository.clone(),
        ),
        authorization_service,
        authz_timeout: config.authz_timeout,
    })
}
