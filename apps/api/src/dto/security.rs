use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

mod conversions;

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `administrative` or `external`. Defaults to `administrative`.
    pub kind: Option<String>,
    #[serde(default)]
    pub permission_ids: Vec<String>,
}

/// Incoming payload for role updates.
///
/// When `permission_ids` is present the role's grants are replaced.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permission_ids: Option<Vec<String>>,
}

/// Incoming payload for cloning a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/clone-role-request.ts"
)]
pub struct CloneRoleRequest {
    pub name: String,
}

/// Incoming payload for granting or denying one permission on a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-permission-request.ts"
)]
pub struct GrantPermissionRequest {
    pub permission_id: String,
    /// `false` records an explicit denial.
    #[serde(default = "granted_by_default")]
    pub granted: bool,
    #[ts(type = "unknown")]
    pub conditions: Option<Value>,
}

fn granted_by_default() -> bool {
    true
}

/// Incoming payload for replacing a role's grants.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/replace-role-permissions-request.ts"
)]
pub struct ReplaceRolePermissionsRequest {
    pub permission_ids: Vec<String>,
}

/// Incoming payload for catalog permission creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub role_id: String,
}

/// Incoming payload for account status changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-status-request.ts"
)]
pub struct UpdateUserStatusRequest {
    pub status: String,
}

/// API representation of an RBAC role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: String,
    pub is_system: bool,
    pub kind: String,
}

/// API representation of a catalog permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub name: String,
    pub resource: String,
    pub action: String,
    pub description: String,
    pub category: String,
}

/// API representation of a grant or denial on a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-grant-response.ts"
)]
pub struct RoleGrantResponse {
    pub permission: PermissionResponse,
    pub granted: bool,
    #[ts(type = "unknown")]
    pub conditions: Option<Value>,
}

/// Role with its grants and denials.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-details-response.ts"
)]
pub struct RoleDetailsResponse {
    pub role: RoleResponse,
    pub grants: Vec<RoleGrantResponse>,
}
