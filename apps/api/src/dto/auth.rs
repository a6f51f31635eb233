use serde::{Deserialize, Serialize};
use ts_rs::TS;
use wayfare_application::AuthContext;
use wayfare_domain::User;

/// Incoming payload for email/password registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of a user account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub primary_role: String,
    pub status: String,
}

/// Bearer credential issued after a successful login.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: String,
    pub user: UserResponse,
}

/// Caller identity with its roles and effective permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub user: UserResponse,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            user_id: value.id().to_string(),
            email: value.email().as_str().to_owned(),
            display_name: value.display_name().as_str().to_owned(),
            primary_role: value.primary_role().to_owned(),
            status: value.status().as_str().to_owned(),
        }
    }
}

impl From<&AuthContext> for MeResponse {
    fn from(value: &AuthContext) -> Self {
        Self {
            user: UserResponse::from(value.user().clone()),
            roles: value
                .roles()
                .iter()
                .map(|role| role.name().as_str().to_owned())
                .collect(),
            permissions: value
                .permissions()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
