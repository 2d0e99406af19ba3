//! Token issuance, bearer validation and the explicit city-claim guard.
//!
//! The credential check is a stub: any username/password pair yields the same
//! Antwerp-bound identity, standing in for a real user store. Tokens are HS256
//! JWTs with a fixed validity window from issuance time.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::{AppState, AuthConfig};

/// Claims embedded in an issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub given_name: String,
    pub family_name: String,
    pub city: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Identity constructed for the duration of token issuance only.
#[derive(Debug, Clone)]
pub struct CityInfoUser {
    pub user_id: i64,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}

/// Stubbed credential check.
///
/// Always succeeds with a hardcoded identity; values would normally come from
/// a user table.
pub fn validate_user_credentials(
    user_name: Option<&str>,
    _password: Option<&str>,
) -> Option<CityInfoUser> {
    Some(CityInfoUser {
        user_id: 1,
        user_name: user_name.unwrap_or_default().to_string(),
        first_name: "Carlos".to_string(),
        last_name: "Aguilar".to_string(),
        city: "Antwerp".to_string(),
    })
}

/// Mint a signed token for the given identity, valid for the configured
/// window starting now.
pub fn issue_token(auth: &AuthConfig, user: &CityInfoUser) -> Result<String> {
    let key = EncodingKey::from_base64_secret(&auth.secret)
        .map_err(|e| AppError::Config(format!("invalid signing secret: {}", e)))?;

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.user_id.to_string(),
        given_name: user.first_name.clone(),
        family_name: user.last_name.clone(),
        city: user.city.clone(),
        iss: auth.issuer.clone(),
        aud: auth.audience.clone(),
        iat: now,
        nbf: now,
        exp: now + auth.token_ttl_secs,
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))?;
    Ok(token)
}

/// Validate a bearer token's signature, expiry, issuer and audience.
pub fn decode_token(auth: &AuthConfig, token: &str) -> Result<Claims> {
    let key = DecodingKey::from_base64_secret(&auth.secret)
        .map_err(|e| AppError::Config(format!("invalid signing secret: {}", e)))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&auth.issuer]);
    validation.set_audience(&[&auth.audience]);

    let data = decode::<Claims>(token, &key, &validation)?;
    Ok(data.claims)
}

/// Guard requiring the caller's `city` claim to equal the given city.
///
/// Replaces a declarative authorization policy with an explicit check over
/// the resolved claims; a mismatch is `Forbidden`, distinct from the
/// missing/invalid-token `Unauthorized`.
pub fn require_city(claims: &Claims, city: &str) -> Result<()> {
    if claims.city != city {
        return Err(AppError::Forbidden(format!(
            "caller's city claim does not grant access to {} resources",
            city
        )));
    }
    Ok(())
}

/// Extractor for the authenticated caller; rejects with 401 when the bearer
/// token is missing, malformed, expired or signed with the wrong key.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_string()))?;

        let claims = decode_token(&state.config.auth, token)?;
        Ok(CurrentUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            secret: "dGVzdC1zZWNyZXQtZm9yLXVuaXQtdGVzdHMtb25seQ==".to_string(),
            issuer: "https://localhost:3000".to_string(),
            audience: "cityinfoapi".to_string(),
            token_ttl_secs: 3600,
        }
    }

    fn antwerp_user() -> CityInfoUser {
        validate_user_credentials(Some("carlos"), Some("whatever")).unwrap()
    }

    #[test]
    fn test_issue_and_decode_round_trip() {
        let auth = test_auth_config();
        let token = issue_token(&auth, &antwerp_user()).unwrap();

        let claims = decode_token(&auth, &token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.given_name, "Carlos");
        assert_eq!(claims.family_name, "Aguilar");
        assert_eq!(claims.city, "Antwerp");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = test_auth_config();
        let token = issue_token(&auth, &antwerp_user()).unwrap();

        let other = AuthConfig {
            secret: "b3RoZXItc2VjcmV0LW5vdC10aGUtcmlnaHQtb25l".to_string(),
            ..auth
        };
        assert!(decode_token(&other, &token).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let auth = test_auth_config();
        let token = issue_token(&auth, &antwerp_user()).unwrap();

        let other = AuthConfig {
            audience: "someotherapi".to_string(),
            ..test_auth_config()
        };
        assert!(decode_token(&other, &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = AuthConfig {
            token_ttl_secs: -7200,
            ..test_auth_config()
        };
        let token = issue_token(&auth, &antwerp_user()).unwrap();
        assert!(decode_token(&test_auth_config(), &token).is_err());
    }

    #[test]
    fn test_require_city_guard() {
        let auth = test_auth_config();
        let token = issue_token(&auth, &antwerp_user()).unwrap();
        let claims = decode_token(&auth, &token).unwrap();

        assert!(require_city(&claims, "Antwerp").is_ok());
        let denied = require_city(&claims, "Paris").unwrap_err();
        assert_eq!(denied.status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
