//! Access token handling.
//!
//! The server issues short-lived HS256 JWTs whose `sub` claim carries the user id. REST callers
//! present the token in the `Authorization: Bearer` header; the WebSocket gateway accepts it as a
//! `token` query parameter because browsers cannot set headers on a WebSocket handshake.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::Duration;
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    Token,
    UntrustedToken,
};
use market_engine::db_types::UserId;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: UserId,
}

/// Validate a token against the configured secret and return its claims.
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<JwtClaims, AuthError> {
    let untrusted = UntrustedToken::new(token).map_err(|e| AuthError::PoorlyFormattedToken(format!("{e}")))?;
    let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
    let token: Token<JwtClaims> =
        Hs256.validator(&key).validate(&untrusted).map_err(|e| AuthError::ValidationError(format!("{e}")))?;
    token
        .claims()
        .validate_expiration(&TimeOptions::default())
        .map_err(|e| AuthError::ValidationError(format!("{e}")))?;
    Ok(token.claims().custom.clone())
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let config = req
        .app_data::<web::Data<AuthConfig>>()
        .ok_or_else(|| ServerError::InitializeError("AuthConfig is not registered on the server".into()))?;
    let value = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token".into()))?;
    let claims = decode_token(token.trim(), config)?;
    Ok(claims)
}

pub struct TokenIssuer {
    key: Hs256Key,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: Hs256Key::new(config.jwt_secret.reveal().as_bytes()) }
    }

    /// Issue a signed access token for the given user. The default lifetime is 24 hours.
    pub fn issue_token(&self, user_id: UserId, duration: Option<Duration>) -> Result<String, AuthError> {
        let duration = duration.unwrap_or_else(|| Duration::hours(24));
        let claims = Claims::new(JwtClaims { sub: user_id })
            .set_duration_and_issuance(&TimeOptions::default(), duration);
        let header = Header::empty().with_token_type("JWT");
        let token = Hs256.token(&header, &claims, &self.key).map_err(|e| AuthError::ValidationError(format!("{e}")))?;
        Ok(token)
    }
}
