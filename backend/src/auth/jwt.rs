//! JWT token issuance and verification
//!
//! Tokens are self-contained: the server keeps no session table and no
//! revocation list, so a token stays valid until it expires. Rotating the
//! secret invalidates every outstanding token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Token failures
#[derive(Error, Debug)]
pub enum TokenError {
    /// Bad signature, malformed token, unknown subject or expiry all collapse here
    #[error("invalid or expired token")]
    InvalidOrExpired,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Pre-computed JWT keys, created once at startup
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    token_expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact; no grace period
        validation.leeway = 0;

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            token_expiry_secs,
        }
    }

    /// Issue a token for a user, expiring `token_expiry_secs` from now
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.token_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.keys.encoding)?)
    }

    /// Verify a token and return the user it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            debug!(reason = %e, "Token rejected");
            TokenError::InvalidOrExpired
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::InvalidOrExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("test-secret", -5);
        let token = service.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issuer = JwtService::new("first-secret", 3600);
        let verifier = JwtService::new("rotated-secret", 3600);
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(TokenError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = create_test_service();
        let token = service.issue(Uuid::new_v4()).unwrap();
        let other = service.issue(Uuid::new_v4()).unwrap();

        // Splice the payload of one token onto the signature of another
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        if forged != token {
            assert!(service.verify(&forged).is_err());
        }
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let service = create_test_service();
        let claims = Claims {
            sub: "42".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(&Header::default(), &claims, &JwtKeys::new("test-secret").encoding)
            .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let _cloned = service.clone(); // Should be cheap due to Arc
    }

    proptest! {
        #[test]
        fn prop_garbage_never_verifies(token in "[A-Za-z0-9_.-]{0,120}") {
            let service = create_test_service();
            prop_assert!(service.verify(&token).is_err());
        }
    }
}
