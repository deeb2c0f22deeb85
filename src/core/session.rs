//! Per-request session context and bearer-token helpers.

use crate::infrastructure::entities::{AuthSession, Profile};
use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// The signed-in caller, resolved from the bearer token on every request.
///
/// Created when a token is resolved and dropped with the request. Signing out deletes the
/// stored session, after which the same token no longer resolves.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(session: &AuthSession, profile: &Profile) -> SessionContext {
        SessionContext {
            user_id: profile.id,
            email: profile.email.clone(),
            token_hash: session.token_hash.clone(),
            expires_at: session.expires_at,
        }
    }
}

/// A freshly issued session. The plain token is only ever returned here.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: Profile,
}

pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_random_hex() {
        let first = generate_token();
        let second = generate_token();

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_hash_is_stable_and_differs_from_token() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
