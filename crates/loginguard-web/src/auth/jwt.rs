//! Session tokens handed out after a login the limiter let through.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    /// Token id, the key used for logout revocation.
    pub jti: String,
}

pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
}

pub fn issue(auth: &AuthConfig, username: &str) -> anyhow::Result<IssuedToken> {
    let issued_at = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        sub: username.to_string(),
        exp: issued_at + auth.jwt_ttl_hours * 3600,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    let key = EncodingKey::from_secret(auth.jwt_secret.as_bytes());
    let token = jsonwebtoken::encode(&Header::default(), &claims, &key)?;

    Ok(IssuedToken {
        token,
        expires_at: claims.exp,
    })
}

/// Checks signature and expiry. Revocation is the caller's concern.
pub fn decode(auth: &AuthConfig, token: &str) -> anyhow::Result<Claims> {
    let key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());
    Ok(jsonwebtoken::decode::<Claims>(token, &key, &Validation::default())?.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_ttl_hours: 1,
        }
    }

    #[test]
    fn issued_token_decodes_to_user() {
        let auth = auth("test-secret-that-is-long-enough-for-hs256");
        let issued = issue(&auth, "alice").unwrap();
        let claims = decode(&auth, &issued.token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, issued.expires_at);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn other_secret_is_rejected() {
        let issued = issue(&auth("test-secret-that-is-long-enough-for-hs256"), "alice").unwrap();
        assert!(decode(&auth("another-secret"), &issued.token).is_err());
    }

    #[test]
    fn every_login_gets_a_fresh_token_id() {
        let auth = auth("test-secret-that-is-long-enough-for-hs256");
        let a = decode(&auth, &issue(&auth, "alice").unwrap().token).unwrap();
        let b = decode(&auth, &issue(&auth, "alice").unwrap().token).unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
