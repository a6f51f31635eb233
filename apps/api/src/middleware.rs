use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;
use wayfare_core::{AppError, AuthFailure};
use wayfare_domain::{Action, PermissionKey, ResourceName};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Guard state for one route: the shared services plus the permission the
/// route demands, if any.
#[derive(Clone)]
pub struct RouteGuard {
    state: AppState,
    permission: Option<PermissionKey>,
}

/// Wraps the route so that it only runs for callers allowed to perform
/// `action` on `resource`. The resolved `AuthContext` is placed in request
/// extensions.
pub fn require_authorization(
    state: &AppState,
    resource: &str,
    action: Action,
    route: MethodRouter<AppState>,
) -> Result<MethodRouter<AppState>, AppError> {
    let permission = PermissionKey::new(ResourceName::new(resource)?, action);
    let guard = RouteGuard {
        state: state.clone(),
        permission: Some(permission),
    };

    Ok(route.route_layer(from_fn_with_state(guard, guard_request)))
}

/// Wraps the route so that it only runs for authenticated callers.
pub fn require_authentication(
    state: &AppState,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let guard = RouteGuard {
        state: state.clone(),
        permission: None,
    };

    route.route_layer(from_fn_with_state(guard, guard_request))
}

async fn guard_request(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let credential = bearer_token(request.headers())?.to_owned();
    let service = &guard.state.authorization_service;

    let pipeline = async {
        let context = service.authenticate(&credential).await?;
        if let Some(permission) = &guard.permission {
            service.require(&context, permission)?;
        }

        Ok::<_, ApiError>(context)
    };

    let context = tokio::time::timeout(guard.state.authz_timeout, pipeline)
        .await
        .map_err(|_| {
            AppError::Unavailable(format!(
                "authorization did not complete within {} ms",
                guard.state.authz_timeout.as_millis()
            ))
        })??;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty());

    token.ok_or_else(|| {
        tracing::debug!(reason = "missing_bearer", "credential rejected");
        AuthFailure::InvalidCredential.into()
    })
}
