use async_trait::async_trait;
use chrono::{DateTime, Utc};

use wayfare_core::{AppResult, AuthFailure};
use wayfare_domain::{Permission, Role, RoleGrant, RoleId, User, UserId};

/// Read side of the role and permission store used on every request.
#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// Finds a user by identifier.
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Lists roles currently assigned to the user.
    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Lists permissions granted to the role, excluding explicit denials.
    async fn list_permissions_for_role(&self, role_id: RoleId) -> AppResult<Vec<Permission>>;

    /// Lists grants and explicit denials attached to the role.
    async fn list_grants_for_role(&self, role_id: RoleId) -> AppResult<Vec<RoleGrant>>;

    /// Lists grants and denials for several roles at once.
    ///
    /// Adapters that can batch the lookup should override this.
    async fn list_grants_for_roles(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleGrant>> {
        let mut grants = Vec::new();
        for role_id in role_ids {
            grants.extend(self.list_grants_for_role(*role_id).await?);
        }

        Ok(grants)
    }

    /// Records that the user was seen.
    async fn touch_last_seen(&self, user_id: UserId) -> AppResult<()>;
}

/// Verified content of a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectClaim {
    /// User the credential was issued to.
    pub subject: UserId,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Role label embedded at issue time. Never used for decisions.
    pub advisory_role: Option<String>,
}

/// Signed credential handed to a client after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    /// Opaque bearer token.
    pub token: String,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

/// Port validating bearer credentials. Implementations must be pure.
pub trait CredentialVerifier: Send + Sync {
    /// Verifies signature and expiry and returns the embedded claim.
    fn verify(&self, credential: &str) -> Result<SubjectClaim, AuthFailure>;
}

/// Port signing bearer credentials for authenticated users.
pub trait CredentialIssuer: Send + Sync {
    /// Issues a credential for the user.
    fn issue(&self, user: &User) -> AppResult<IssuedCredential>;
}
