use axum::Router;
use axum::routing::{MethodRouter, delete, get, post, put};
use tower_http::trace::TraceLayer;
use wayfare_core::AppError;
use wayfare_domain::Action;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let guard = |resource: &str, action: Action, route: MethodRouter<AppState>| {
        middleware::require_authorization(&app_state, resource, action, route)
    };

    let role_routes = Router::new()
        .route(
            "/api/roles",
            guard("roles", Action::Read, get(handlers::security::list_roles_handler))?.merge(
                guard(
                    "roles",
                    Action::Create,
                    post(handlers::security::create_role_handler),
                )?,
            ),
        )
        .route(
            "/api/roles/{role_id}",
            guard("roles", Action::Read, get(handlers::security::get_role_handler))?
                .merge(guard(
                    "roles",
                    Action::Update,
                    put(handlers::security::update_role_handler),
                )?)
                .merge(guard(
                    "roles",
                    Action::Delete,
                    delete(handlers::security::delete_role_handler),
                )?),
        )
        .route(
            "/api/roles/{role_id}/clone",
            guard(
                "roles",
                Action::Create,
                post(handlers::security::clone_role_handler),
            )?,
        )
        .route(
            "/api/roles/{role_id}/permissions",
            guard(
                "roles",
                Action::Read,
                get(handlers::security::list_role_permissions_handler),
            )?
            .merge(guard(
                "roles",
                Action::Update,
                post(handlers::security::grant_permission_handler),
            )?)
            .merge(guard(
                "roles",
                Action::Update,
                put(handlers::security::replace_role_permissions_handler),
            )?),
        )
        .route(
            "/api/roles/{role_id}/permissions/{permission_id}",
            guard(
                "roles",
                Action::Update,
                delete(handlers::security::revoke_permission_handler),
            )?,
        );

    let permission_routes = Router::new()
        .route(
            "/api/permissions",
            guard(
                "permissions",
                Action::Read,
                get(handlers::security::list_permissions_handler),
            )?
            .merge(guard(
                "permissions",
                Action::Create,
                post(handlers::security::create_permission_handler),
            )?),
        )
        .route(
            "/api/permissions/{permission_id}",
            guard(
                "permissions",
                Action::Delete,
                delete(handlers::security::delete_permission_handler),
            )?,
        );

    let user_routes = Router::new()
        .route(
            "/api/users/{user_id}/roles",
            guard(
                "users",
                Action::Read,
                get(handlers::users::list_user_roles_handler),
            )?
            .merge(guard(
                "users",
                Action::Update,
                post(handlers::users::assign_role_handler),
            )?),
        )
        .route(
            "/api/users/{user_id}/roles/{role_id}",
            guard(
                "users",
                Action::Update,
                delete(handlers::users::revoke_role_handler),
            )?,
        )
        .route(
            "/api/users/{user_id}/status",
            guard(
                "users",
                Action::Update,
                put(handlers::users::update_user_status_handler),
            )?,
        );

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route(
            "/auth/me",
            middleware::require_authentication(&app_state, get(auth::me_handler)),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(auth_routes)
        .merge(role_routes)
        .merge(permission_routes)
        .merge(user_routes)
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
