//! JWT access tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens (HS256)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    /// Issuer claim
    pub issuer: String,
}

impl From<&SecurityConfig> for JwtConfig {
    fn from(security: &SecurityConfig) -> Self {
        Self {
            secret: security.secret_key.clone(),
            expiration_minutes: security.token_expire_minutes,
            issuer: security.issuer.clone(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&SecurityConfig::default())
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(username: &str, config: &JwtConfig) -> Self {
        Self::with_lifetime(username, Duration::minutes(config.expiration_minutes), config)
    }

    /// Claims expiring `lifetime` from now. A negative lifetime yields an
    /// already expired token.
    pub fn with_lifetime(username: &str, lifetime: Duration, config: &JwtConfig) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Sign a token for `username`
pub fn create_token(username: &str, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    sign_claims(&TokenClaims::new(username, config), config)
}

pub fn sign_claims(
    claims: &TokenClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, issuer and expiry, then decode the claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let config = JwtConfig::default();
        let token = create_token("inspector", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "inspector");
        assert_eq!(claims.iss, "facility-inspection");
        assert!(claims.exp > Utc::now().timestamp());
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_invalid_token() {
        let config = JwtConfig::default();
        assert!(verify_token("invalid-token", &config).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = JwtConfig::default();
        let claims = TokenClaims::with_lifetime("inspector", Duration::minutes(-5), &config);
        let token = sign_claims(&claims, &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = JwtConfig::default();
        let token = create_token("inspector", &config).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            ..config
        };
        assert!(verify_token(&token, &other).is_err());
    }
}
