//! # Authentication Module
//!
//! Password hashing plus the `Principal` extractor that authenticates a
//! request and resolves the caller's role. Credentials arrive as HTTP
//! Basic auth; the role tag is resolved exactly once here and handlers
//! authorize against the explicit `Role` value instead of probing profile
//! tables per operation.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use base64::Engine as _;
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::models::profile::Role;
use slotbook_db::models::DbAccount;
use slotbook_db::repositories::account;

use crate::{middleware::error_handling::AppError, ApiState};

/// An authenticated caller: the account plus its role tag.
#[derive(Debug, Clone)]
pub struct Principal {
    pub account: DbAccount,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError(SlotError::Authentication(
                    "Missing credentials".to_string(),
                ))
            })?;

        let (username, password) = basic_credentials(header_value).ok_or_else(|| {
            AppError(SlotError::Authentication(
                "Malformed Authorization header".to_string(),
            ))
        })?;

        let account = account::find_by_username(&state.db_pool, &username)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&password, &account.password_hash)? {
            return Err(invalid_credentials().into());
        }

        let role = account::resolve_role(&state.db_pool, account.id)
            .await?
            .ok_or_else(|| {
                // Authenticated but profileless accounts are misconfigured
                SlotError::Authentication(
                    "Your account is not properly configured. Please contact an administrator."
                        .to_string(),
                )
            })?;

        Ok(Principal { account, role })
    }
}

fn invalid_credentials() -> SlotError {
    SlotError::Authentication("Invalid username or password".to_string())
}

fn basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Hashes a password using the Argon2 algorithm
///
/// # Security Notes
///
/// - Uses a random salt for each password
/// - Uses default Argon2 parameters (memory: 19MiB, iterations: 3, parallelism: 4)
/// - Returns password in PHC string format (includes algorithm, version, parameters, salt, and hash)
pub fn hash_password(password: &str) -> SlotResult<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SlotError::Internal(format!("Error hashing password: {}", e).into()))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a plain text password against a stored PHC-format hash.
pub fn verify_password(password: &str, password_hash: &str) -> SlotResult<bool> {
    let parsed_hash = argon2::PasswordHash::new(password_hash)
        .map_err(|e| SlotError::Internal(format!("Invalid password hash: {}", e).into()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
