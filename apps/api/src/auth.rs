use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use wayfare_application::{AuthContext, LoginOutcome, RegisterParams};
use wayfare_core::AppError;

use crate::dto::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /auth/register - Create a new account with email+password.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .register(RegisterParams {
            email: payload.email,
            password: payload.password,
            display_name: payload.display_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/login - Exchange email+password for a bearer credential.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    match state
        .user_service
        .login(&payload.email, &payload.password)
        .await?
    {
        LoginOutcome::Authenticated { user, credential } => Ok(Json(LoginResponse {
            token: credential.token,
            token_type: "Bearer",
            expires_at: credential.expires_at.to_rfc3339(),
            user: UserResponse::from(user),
        })),
        LoginOutcome::Failed => {
            Err(AppError::Unauthorized("invalid email or password".to_owned()).into())
        }
    }
}

/// GET /auth/me - Describe the caller's resolved identity.
pub async fn me_handler(Extension(context): Extension<AuthContext>) -> Json<MeResponse> {
    Json(MeResponse::from(&context))
}
