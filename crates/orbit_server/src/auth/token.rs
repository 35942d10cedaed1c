//! HS256 bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use orbit_core::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Signing material plus token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a token for `user` valid for the configured lifetime.
    pub fn issue(&self, user: UserId) -> jsonwebtoken::errors::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verifies signature and expiry, returning the user id.
    ///
    /// Any failure collapses to `None`; callers only need accept/reject.
    pub fn verify(&self, token: &str) -> Option<UserId> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::TokenKeys;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn issued_token_verifies_to_same_user() {
        let keys = TokenKeys::new("s3cret", Duration::days(1));
        let user = Uuid::new_v4();
        let token = keys.issue(user).unwrap();
        assert_eq!(keys.verify(&token), Some(user));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = TokenKeys::new("one", Duration::days(1));
        let verifier = TokenKeys::new("two", Duration::days(1));
        let token = issuer.issue(Uuid::new_v4()).unwrap();
        assert_eq!(verifier.verify(&token), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("s3cret", Duration::hours(-2));
        let token = keys.issue(Uuid::new_v4()).unwrap();
        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = TokenKeys::new("s3cret", Duration::days(1));
        assert_eq!(keys.verify("not.a.token"), None);
    }
}
