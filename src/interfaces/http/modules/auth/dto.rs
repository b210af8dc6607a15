//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AccessToken;

/// Form-encoded `username` / `password`, shared by `/register` and `/login`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsForm {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// OAuth2-style token response, returned without the envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type.to_string(),
            expires_in: token.expires_in,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredResponse {
    pub message: String,
    pub user: UserInfo,
}
