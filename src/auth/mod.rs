use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::store::models::{User, UserRole};

/// Claims embedded in every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            role: user.role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation error: {0}")]
    TokenGeneration(String),
    #[error("password hashing error: {0}")]
    Hashing(String),
}

/// Sign a token for an authenticated user.
pub fn generate_token(user: &User) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), &Claims::new(user), &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Decode and validate a token. Returns `None` on signature mismatch or
/// expiry; callers treat `None` as unauthenticated.
pub fn verify_token(token: &str) -> Option<Claims> {
    let secret = &config::config().security.jwt_secret;
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .ok()
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}
