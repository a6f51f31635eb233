use std::str::FromStr;

use wayfare_application::{CreateRoleInput, GrantPermissionInput, UpdateRoleInput};
use wayfare_domain::RoleKind;

use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&actor)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(role_id): Path<Uuid>,
) -> ApiResult<Json<RoleDetailsResponse>> {
    let details = state
        .security_admin_service
        .get_role(&actor, RoleId::from_uuid(role_id))
        .await?;

    Ok(Json(RoleDetailsResponse::from(details)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let kind = payload
        .kind
        .as_deref()
        .map(RoleKind::from_str)
        .transpose()?
        .unwrap_or(RoleKind::Administrative);

    let role = state
        .security_admin_service
        .create_role(
            &actor,
            CreateRoleInput {
                name: payload.name,
                description: payload.description,
                kind,
                permission_ids: permission_ids(&payload.permission_ids)?,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let permission_ids = payload
        .permission_ids
        .as_deref()
        .map(permission_ids)
        .transpose()?;

    let role = state
        .security_admin_service
        .update_role(
            &actor,
            RoleId::from_uuid(role_id),
            UpdateRoleInput {
                name: payload.name,
                description: payload.description,
                permission_ids,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(role_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_role(&actor, RoleId::from_uuid(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn clone_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<CloneRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .security_admin_service
        .clone_role(&actor, RoleId::from_uuid(role_id), &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(role_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleGrantResponse>>> {
    let grants = state
        .security_admin_service
        .list_role_permissions(&actor, RoleId::from_uuid(role_id))
        .await?
        .into_iter()
        .map(RoleGrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn grant_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<GrantPermissionRequest>,
) -> ApiResult<(StatusCode, Json<RoleGrantResponse>)> {
    let permission_id = PermissionId::from_uuid(parse_id(&payload.permission_id, "permission")?);

    let grant = state
        .security_admin_service
        .grant_permission(
            &actor,
            RoleId::from_uuid(role_id),
            GrantPermissionInput {
                permission_id,
                granted: payload.granted,
                conditions: payload.conditions,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleGrantResponse::from(grant))))
}

pub async fn replace_role_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<ReplaceRolePermissionsRequest>,
) -> ApiResult<Json<Vec<RoleGrantResponse>>> {
    let grants = state
        .security_admin_service
        .replace_role_permissions(
            &actor,
            RoleId::from_uuid(role_id),
            permission_ids(&payload.permission_ids)?,
        )
        .await?
        .into_iter()
        .map(RoleGrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn revoke_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path((role_id, permission_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .revoke_permission(
            &actor,
            RoleId::from_uuid(role_id),
            PermissionId::from_uuid(permission_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
