use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wayfare_application::AuthContext;
use wayfare_domain::{PermissionId, RoleId};

use crate::dto::{
    CloneRoleRequest, CreatePermissionRequest, CreateRoleRequest, GrantPermissionRequest,
    PermissionResponse, ReplaceRolePermissionsRequest, RoleDetailsResponse, RoleGrantResponse,
    RoleResponse, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_id;

mod permissions;
mod roles;

pub use permissions::{
    create_permission_handler, delete_permission_handler, list_permissions_handler,
};
pub use roles::{
    clone_role_handler, create_role_handler, delete_role_handler, get_role_handler,
    grant_permission_handler, list_role_permissions_handler, list_roles_handler,
    replace_role_permissions_handler, revoke_permission_handler, update_role_handler,
};

fn permission_ids(values: &[String]) -> Result<Vec<PermissionId>, wayfare_core::AppError> {
    values
        .iter()
        .map(|value| parse_id(value, "permission").map(PermissionId::from_uuid))
        .collect()
}
