//! Bearer-token authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::AuthService;
use crate::domain::{DomainError, User};
use crate::interfaces::http::common::ApiError;

/// Authentication state
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// Caller resolved from the bearer token, stored in request extensions.
///
/// Extract in handlers: `Extension(user): Extension<AuthenticatedUser>`
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Rejects the request with 401 unless it carries a valid bearer token
/// for an existing user.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .map(String::from);

    let Some(token) = token else {
        return ApiError(DomainError::Unauthorized("Not authenticated".into())).into_response();
    };

    match auth_state.auth.authorize(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(AuthenticatedUser::from(user));
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_token("Bearer"), None);
    }
}
