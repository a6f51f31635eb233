use wayfare_application::CreatePermissionInput;

use super::*;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .security_admin_service
        .list_permissions(&actor)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .security_admin_service
        .create_permission(
            &actor,
            CreatePermissionInput {
                resource: payload.resource,
                action: payload.action,
                description: payload.description,
                category: payload.category,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(permission_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_permission(&actor, PermissionId::from_uuid(permission_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
