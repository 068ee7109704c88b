//! Identity tokens.
//!
//! Tokens are compact JWTs signed with the service's Ed25519 key. They are
//! stateless: a token is valid while its signature verifies against the
//! public key and the current time is strictly before `exp`. Verification at
//! exactly `exp` fails.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::keys::{ConfigurationError, KeyStore};
use crate::config::SecurityConfig;

pub const DEFAULT_ISSUER: &str = "budget-userservice";

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
    pub iss: String,
}

/// Verified identity of the caller, scoped to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("unable to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            // tokens signed for another algorithm count as forged
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TokenService {
    keys: Arc<KeyStore>,
    issuer: String,
    ttl: Duration,
    remember_ttl: Duration,
}

impl TokenService {
    pub fn new(keys: Arc<KeyStore>) -> Self {
        Self {
            keys,
            issuer: DEFAULT_ISSUER.to_string(),
            ttl: Duration::hours(24),
            remember_ttl: Duration::days(30),
        }
    }

    /// Fails when either lifetime is zero or would overflow a timestamp.
    pub fn from_config(keys: Arc<KeyStore>, security: &SecurityConfig) -> Result<Self, ConfigurationError> {
        let ttl = ttl_hours("SECURITY_TOKEN_EXPIRY_HOURS", security.token_expiry_hours)?;
        let remember_ttl = ttl_hours("SECURITY_REMEMBER_ME_EXPIRY_HOURS", security.remember_me_expiry_hours)?;

        Ok(Self::new(keys)
            .with_issuer(security.token_issuer.clone())
            .with_ttl(ttl)
            .with_remember_ttl(remember_ttl))
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_remember_ttl(mut self, ttl: Duration) -> Self {
        self.remember_ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` valid for the standard TTL.
    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now(), self.ttl)
    }

    /// Issue a token valid for the longer "remember me" TTL.
    pub fn issue_remembered(&self, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now(), self.remember_ttl)
    }

    /// Verify signature, structure and expiry; returns the caller's identity.
    pub fn verify(&self, token: &str) -> Result<AuthContext, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub(crate) fn issue_at(&self, user_id: &str, now: DateTime<Utc>, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(ttl)
                .ok_or_else(|| TokenError::Signing(format!("token lifetime {ttl} is out of range")))?
                .timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(self.keys.algorithm()), &claims, self.keys.private_key())
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub(crate) fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthContext, TokenError> {
        let mut validation = Validation::new(self.keys.algorithm());
        // Expiry is checked below against `now` so the boundary stays exclusive.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<Claims>(token, self.keys.public_key(), &validation)?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed("empty subject".to_string()));
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(AuthContext { user_id: claims.sub })
    }
}

fn ttl_hours(name: &'static str, hours: u64) -> Result<Duration, ConfigurationError> {
    let invalid = |reason: &str| ConfigurationError::InvalidSetting { name, reason: format!("{hours}: {reason}") };

    if hours == 0 {
        return Err(invalid("must be at least one hour"));
    }
    let ttl = i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .ok_or_else(|| invalid("out of range"))?;
    Utc::now().checked_add_signed(ttl).ok_or_else(|| invalid("out of range"))?;

    Ok(ttl)
}
