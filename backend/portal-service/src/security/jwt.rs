use anyhow::{anyhow, Result};
/// JWT token generation and validation using HS256.
/// Access and refresh tokens are signed with separate secrets.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use lazy_static::lazy_static;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::UserRole;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID, hex ObjectId)
    pub sub: String,
    /// Account role at issue time
    pub role: UserRole,
    /// Email address
    pub email: String,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

use std::sync::RwLock;

// Thread-safe storage for the secrets loaded from configuration
lazy_static! {
    static ref JWT_KEYS: RwLock<Option<JwtKeys>> = RwLock::new(None);
}

/// Initialize signing secrets. Must be called during application startup
/// before any token operation.
pub fn initialize_secrets(
    access_secret: &str,
    refresh_secret: &str,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
) -> Result<()> {
    if access_secret.is_empty() || refresh_secret.is_empty() {
        return Err(anyhow!("JWT secrets must not be empty"));
    }

    let keys = JwtKeys {
        access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
        access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
        refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
        refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        access_ttl_secs,
        refresh_ttl_secs,
    };

    let mut slot = JWT_KEYS
        .write()
        .map_err(|e| anyhow!("Failed to acquire write lock on JWT keys: {}", e))?;
    *slot = Some(keys);

    Ok(())
}

fn with_keys<T>(f: impl FnOnce(&JwtKeys) -> Result<T>) -> Result<T> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock on JWT keys: {}", e))?;
    let keys = keys
        .as_ref()
        .ok_or_else(|| anyhow!("JWT secrets not initialized. Call initialize_secrets() during startup"))?;
    f(keys)
}

fn build_claims(
    user_id: ObjectId,
    role: UserRole,
    email: &str,
    token_type: &str,
    ttl_secs: i64,
) -> Claims {
    let now = Utc::now();
    let expiry = now + Duration::seconds(ttl_secs);
    Claims {
        sub: user_id.to_hex(),
        role,
        email: email.to_string(),
        token_type: token_type.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
    }
}

/// Generate a new access token
pub fn generate_access_token(user_id: ObjectId, role: UserRole, email: &str) -> Result<String> {
    with_keys(|keys| {
        let claims = build_claims(user_id, role, email, "access", keys.access_ttl_secs);
        encode(&Header::default(), &claims, &keys.access_encoding)
            .map_err(|e| anyhow!("Failed to generate access token: {}", e))
    })
}

/// Generate a new refresh token
pub fn generate_refresh_token(user_id: ObjectId, role: UserRole, email: &str) -> Result<String> {
    with_keys(|keys| {
        let claims = build_claims(user_id, role, email, "refresh", keys.refresh_ttl_secs);
        encode(&Header::default(), &claims, &keys.refresh_encoding)
            .map_err(|e| anyhow!("Failed to generate refresh token: {}", e))
    })
}

/// Generate both access and refresh tokens
pub fn generate_token_pair(user_id: ObjectId, role: UserRole, email: &str) -> Result<TokenPair> {
    let access_token = generate_access_token(user_id, role, email)?;
    let refresh_token = generate_refresh_token(user_id, role, email)?;
    let expires_in = with_keys(|keys| Ok(keys.access_ttl_secs))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in,
    })
}

/// Validate and decode an access token
pub fn validate_access_token(token: &str) -> Result<TokenData<Claims>> {
    let data = with_keys(|keys| {
        decode::<Claims>(token, &keys.access_decoding, &Validation::default())
            .map_err(|e| anyhow!("Token validation failed: {}", e))
    })?;
    if data.claims.token_type != "access" {
        return Err(anyhow!("Not an access token"));
    }
    Ok(data)
}

/// Validate and decode a refresh token
pub fn validate_refresh_token(token: &str) -> Result<TokenData<Claims>> {
    let data = with_keys(|keys| {
        decode::<Claims>(token, &keys.refresh_decoding, &Validation::default())
            .map_err(|e| anyhow!("Token validation failed: {}", e))
    })?;
    if data.claims.token_type != "refresh" {
        return Err(anyhow!("Not a refresh token"));
    }
    Ok(data)
}

/// Extract the user id from a validated access token
pub fn user_id_from_token(token: &str) -> Result<ObjectId> {
    let data = validate_access_token(token)?;
    ObjectId::parse_str(&data.claims.sub).map_err(|e| anyhow!("Invalid user ID in token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        // Idempotent across the test binary.
        let _ = initialize_secrets("test-access-secret", "test-refresh-secret", 3600, 86_400);
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        init();
        let user_id = ObjectId::new();
        let token = generate_access_token(user_id, UserRole::Student, "test@example.com")
            .expect("token should be generated");
        assert_eq!(token.matches('.').count(), 2);

        let data = validate_access_token(&token).expect("token should validate");
        assert_eq!(data.claims.sub, user_id.to_hex());
        assert_eq!(data.claims.email, "test@example.com");
        assert_eq!(data.claims.role, UserRole::Student);
        assert_eq!(data.claims.token_type, "access");
    }

    #[test]
    fn test_token_pair_types_are_not_interchangeable() {
        init();
        let user_id = ObjectId::new();
        let pair = generate_token_pair(user_id, UserRole::Admin, "a@b.c").unwrap();

        assert!(validate_access_token(&pair.access_token).is_ok());
        assert!(validate_refresh_token(&pair.refresh_token).is_ok());
        // Signed with different secrets, so cross-validation must fail.
        assert!(validate_access_token(&pair.refresh_token).is_err());
        assert!(validate_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_refresh_expires_after_access() {
        init();
        let user_id = ObjectId::new();
        let pair = generate_token_pair(user_id, UserRole::Teacher, "t@b.c").unwrap();
        let access = validate_access_token(&pair.access_token).unwrap().claims;
        let refresh = validate_refresh_token(&pair.refresh_token).unwrap().claims;
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_invalid_token_rejected() {
        init();
        assert!(validate_access_token("not.a.token").is_err());
    }

    #[test]
    fn test_user_id_round_trip() {
        init();
        let user_id = ObjectId::new();
        let token = generate_access_token(user_id, UserRole::Student, "x@y.z").unwrap();
        assert_eq!(user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_token_pair_metadata() {
        init();
        let pair = generate_token_pair(ObjectId::new(), UserRole::Student, "x@y.z").unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);
    }
}
