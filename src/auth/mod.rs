/*!
 * # Authentication
 *
 * Bearer-token verification for the API. Tokens are HS256 JWTs issued by
 * the organisation's identity service; this crate only verifies them and
 * turns the claims into an [`AuthUser`] placed in request extensions.
 */

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::ServiceError;

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user name used for audit stamps)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Authenticated caller; handlers take it as an extractor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

pub type AuthenticatedUser = AuthUser;

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Settings for token verification
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, issuer: Option<String>, audience: Option<String>) -> Self {
        Self {
            jwt_secret,
            issuer,
            audience,
        }
    }
}

impl From<&AppConfig> for AuthConfig {
    fn from(config: &AppConfig) -> Self {
        AuthConfig::new(
            config.jwt_secret.clone(),
            config.auth_issuer.clone(),
            config.auth_audience.clone(),
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("No authentication token provided")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Authentication service not available")]
    ServiceUnavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::ServiceUnavailable => {
                ServiceError::InternalError(self.to_string()).into_response()
            }
            other => ServiceError::Unauthorized(other.to_string()).into_response(),
        }
    }
}

/// Verifies bearer tokens
#[derive(Debug, Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        if let Some(audience) = &self.config.audience {
            validation.set_audience(&[audience.as_str()]);
            validation.required_spec_claims.insert("aud".to_string());
        }

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
        let claims = self.validate_token(token)?;
        Ok(AuthUser {
            user_id: claims.sub,
            name: claims.name,
            roles: claims.roles,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid bearer token and stores the caller in
/// request extensions. Expects `Arc<AuthService>` as a request extension.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => return AuthError::ServiceUnavailable.into_response(),
    };

    match auth_service.authenticate(request.headers()) {
        Ok(user) => {
            debug!(user = %user.user_id, "request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit_test_secret_with_enough_length_and_variety_42";

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new(SECRET.into(), None, None))
    }

    fn token(sub: &str, exp_offset: i64) -> String {
        token_from(sub, exp_offset, None, None)
    }

    fn token_from(sub: &str, exp_offset: i64, iss: Option<&str>, aud: Option<&str>) -> String {
        let claims = Claims {
            sub: sub.into(),
            name: Some("QA Officer".into()),
            roles: vec!["qa".into()],
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iat: Some(chrono::Utc::now().timestamp()),
            iss: iss.map(Into::into),
            aud: aud.map(Into::into),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn valid_token_yields_user() {
        let user = service()
            .authenticate(&headers_with(&format!("Bearer {}", token("jdoe", 600))))
            .unwrap();
        assert_eq!(user.user_id, "jdoe");
        assert!(user.has_role("qa"));
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            service().authenticate(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            service().authenticate(&headers_with("Basic abc")),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let result = service().authenticate(&headers_with(&format!(
            "Bearer {}",
            token("jdoe", -3600)
        )));
        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(AuthConfig::new(
            "a_completely_different_secret_value_for_tests_99".into(),
            None,
            None,
        ));
        let result = other.authenticate(&headers_with(&format!("Bearer {}", token("jdoe", 600))));
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[test]
    fn issuer_is_enforced_when_configured() {
        let strict = AuthService::new(AuthConfig::new(
            SECRET.into(),
            Some("pharma-idp".into()),
            None,
        ));
        let result = strict.authenticate(&headers_with(&format!("Bearer {}", token("jdoe", 600))));
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[test]
    fn matching_issuer_is_accepted() {
        let strict = AuthService::new(AuthConfig::new(
            SECRET.into(),
            Some("pharma-idp".into()),
            None,
        ));
        let signed = token_from("jdoe", 600, Some("pharma-idp"), None);
        let user = strict
            .authenticate(&headers_with(&format!("Bearer {}", signed)))
            .unwrap();
        assert_eq!(user.user_id, "jdoe");

        let foreign = token_from("jdoe", 600, Some("other-idp"), None);
        assert_eq!(
            strict.authenticate(&headers_with(&format!("Bearer {}", foreign))),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn audience_is_required_when_configured() {
        let strict = AuthService::new(AuthConfig::new(
            SECRET.into(),
            None,
            Some("pharma-erp".into()),
        ));
        let missing = token("jdoe", 600);
        assert_eq!(
            strict.authenticate(&headers_with(&format!("Bearer {}", missing))),
            Err(AuthError::InvalidToken)
        );

        let signed = token_from("jdoe", 600, None, Some("pharma-erp"));
        assert!(strict
            .authenticate(&headers_with(&format!("Bearer {}", signed)))
            .is_ok());
    }
}
