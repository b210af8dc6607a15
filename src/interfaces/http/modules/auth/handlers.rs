//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::dto::{CredentialsForm, RegisteredResponse, TokenResponse, UserInfo};
use crate::application::AuthService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedForm};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "User registered", body = ApiResponse<RegisteredResponse>),
        (status = 400, description = "Username already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedForm(form): ValidatedForm<CredentialsForm>,
) -> ApiResult<Json<ApiResponse<RegisteredResponse>>> {
    let user = state.auth.register(&form.username, &form.password).await?;

    Ok(Json(ApiResponse::success(RegisteredResponse {
        message: "User registered successfully".to_string(),
        user: UserInfo {
            id: user.id,
            username: user.username,
        },
    })))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedForm(form): ValidatedForm<CredentialsForm>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(token.into()))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::success(UserInfo {
        id: user.id,
        username: user.username,
    }))
}
