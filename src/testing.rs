//! Shared fixtures for unit tests: a fixed secret, token minting, a known identity.
use jsonwebtoken::{EncodingKey, Header};

use crate::repos::identity_store::Identity;
use crate::services::auth::verifier::AccessClaims;

pub const SECRET: &str = "test-secret";

pub fn now() -> u64 {
    jsonwebtoken::get_current_timestamp()
}

pub fn mint(secret: &str, user_id: &str, exp: u64) -> String {
    let claims = AccessClaims {
        user_id: user_id.to_string(),
        iat: Some(now()),
        exp,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign test token")
}

pub fn valid_token(user_id: &str) -> String {
    mint(SECRET, user_id, now() + 3600)
}

pub fn expired_token(user_id: &str) -> String {
    mint(SECRET, user_id, now() - 3600)
}

pub fn alice() -> Identity {
    Identity {
        id: "u1".into(),
        username: "alice".into(),
        image_url: None,
    }
}
