use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wayfare_application::AuthContext;
use wayfare_domain::{RoleId, UserId, UserStatus};

use crate::dto::{AssignRoleRequest, RoleResponse, UpdateUserStatusRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_id;

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_user_roles(&actor, UserId::from_uuid(user_id))
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::from_uuid(parse_id(&payload.role_id, "role")?);

    state
        .security_admin_service
        .assign_role(&actor, UserId::from_uuid(user_id), role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path((user_id, role_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .revoke_role(&actor, UserId::from_uuid(user_id), RoleId::from_uuid(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_user_status_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> ApiResult<Json<UserResponse>> {
    let status = UserStatus::from_str(&payload.status)?;
    let user = state
        .user_service
        .set_status(&actor, UserId::from_uuid(user_id), status)
        .await?;

    Ok(Json(UserResponse::from(user)))
}
