use std::sync::Arc;

use wayfare_core::{AccessError, AppError, AppResult};
use wayfare_domain::{
    AuthorizationDecision, DecisionEngine, PermissionKey, PermissionSet, Role, User,
};

use crate::{
    AccessRepository, CredentialVerifier, IdentityResolver, PermissionAggregator, SubjectClaim,
};

/// Resolved caller of one request.
///
/// Built fresh per request and passed explicitly to guarded operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user: User,
    roles: Vec<Role>,
    permissions: PermissionSet,
    claim: SubjectClaim,
}

impl AuthContext {
    /// Returns the authenticated user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns roles held at resolution time.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns the effective permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns the verified credential claim.
    #[must_use]
    pub fn claim(&self) -> &SubjectClaim {
        &self.claim
    }

    /// Returns the audit subject label for this caller.
    #[must_use]
    pub fn subject(&self) -> String {
        self.user.id().to_string()
    }
}

/// Runs the authenticate-then-authorize pipeline.
#[derive(Clone)]
pub struct AuthorizationService {
    verifier: Arc<dyn CredentialVerifier>,
    resolver: IdentityResolver,
    aggregator: PermissionAggregator,
    engine: DecisionEngine,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        repository: Arc<dyn AccessRepository>,
        engine: DecisionEngine,
    ) -> Self {
        Self {
            verifier,
            resolver: IdentityResolver::new(repository.clone()),
            aggregator: PermissionAggregator::new(repository),
            engine,
        }
    }

    /// Verifies the credential and builds the caller context.
    ///
    /// An invalid credential fails before any store access.
    pub async fn authenticate(&self, credential: &str) -> Result<AuthContext, AccessError> {
        let claim = self.verifier.verify(credential).inspect_err(|failure| {
            tracing::debug!(reason = failure.as_str(), "credential rejected");
        })?;

        let identity = self
            .resolver
            .resolve(claim.subject)
            .await
            .inspect_err(|error| {
                if let AccessError::Authentication(failure) = error {
                    tracing::debug!(
                        subject = %claim.subject,
                        reason = failure.as_str(),
                        "subject rejected"
                    );
                }
            })?;
        let permissions = self.aggregator.aggregate(&identity.roles).await?;

        Ok(AuthContext {
            user: identity.user,
            roles: identity.roles,
            permissions,
            claim,
        })
    }

    /// Decides whether the caller may perform the action.
    #[must_use]
    pub fn authorize(&self, context: &AuthContext, key: &PermissionKey) -> AuthorizationDecision {
        let decision = self.engine.authorize(
            &context.roles,
            &context.permissions,
            key.resource(),
            key.action(),
        );

        match decision {
            AuthorizationDecision::Allow(basis) => tracing::debug!(
                subject = %context.user.id(),
                permission = %key,
                basis = basis.as_str(),
                "access allowed"
            ),
            AuthorizationDecision::Deny => tracing::info!(
                subject = %context.user.id(),
                resource = %key.resource(),
                action = %key.action(),
                "access denied"
            ),
        }

        decision
    }

    /// Fails with [`AppError::Forbidden`] unless the caller is allowed.
    pub fn require(&self, context: &AuthContext, key: &PermissionKey) -> AppResult<()> {
        if self.authorize(context, key).is_allowed() {
            return Ok(());
        }

        Err(AppError::Forbidden(format!("missing permission '{key}'")))
    }

    /// Returns whether the caller holds a superuser role.
    #[must_use]
    pub fn is_superuser(&self, context: &AuthContext) -> bool {
        self.engine.is_superuser(&context.roles)
    }

    /// Returns whether `name` is configured as a superuser role name.
    #[must_use]
    pub fn is_superuser_role_name(&self, name: &str) -> bool {
        self.engine
            .superuser_roles()
            .any(|superuser_role| superuser_role == name)
    }

    /// Authenticates the credential and requires the permission in one step.
    pub async fn require_authorization(
        &self,
        credential: &str,
        key: &PermissionKey,
    ) -> AppResult<AuthContext> {
        let context = self.authenticate(credential).await?;
        self.require(&context, key)?;
        Ok(context)
    }
}
