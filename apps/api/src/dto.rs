//! Transport types shared with the web client.

use serde::Serialize;
use ts_rs::TS;

mod auth;
mod security;

pub use auth::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserResponse};
pub use security::{
    AssignRoleRequest, CloneRoleRequest, CreatePermissionRequest, CreateRoleRequest,
    GrantPermissionRequest, PermissionResponse, ReplaceRolePermissionsRequest,
    RoleDetailsResponse, RoleGrantResponse, RoleResponse, UpdateRoleRequest,
    UpdateUserStatusRequest,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}
