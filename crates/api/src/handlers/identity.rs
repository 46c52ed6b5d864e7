//! Registration and login. Passwords are hashed before they reach the
//! repositories; the login response tells the client which dashboard the
//! principal belongs on.

use axum::{extract::State, Json};
use slotbook_core::errors::SlotError;
use slotbook_core::models::profile::{
    LoginResponse, ProfileResponse, RegisterProviderRequest, RegisterUserRequest, Role,
};
use slotbook_db::repositories::profile;
use std::sync::Arc;

use crate::{
    middleware::{auth, auth::Principal, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn register_user(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    require(&payload.username, "Username")?;
    require(&payload.password, "Password")?;
    require(&payload.first_name, "First name")?;
    require(&payload.last_name, "Last name")?;

    let password_hash = auth::hash_password(&payload.password)?;

    let (account, user) = profile::register_user(
        &state.db_pool,
        payload.username.trim(),
        &password_hash,
        payload.first_name.trim(),
        payload.last_name.trim(),
    )
    .await?;

    Ok(Json(ProfileResponse {
        account_id: account.id,
        username: account.username,
        role: Role::EndUser,
        display_name: user.display_name(),
    }))
}

#[axum::debug_handler]
pub async fn register_provider(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterProviderRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    require(&payload.username, "Username")?;
    require(&payload.password, "Password")?;
    require(&payload.first_name, "First name")?;
    require(&payload.last_name, "Last name")?;
    require(&payload.qualifications, "Qualifications")?;

    let password_hash = auth::hash_password(&payload.password)?;

    let (account, provider) = profile::register_provider(
        &state.db_pool,
        payload.username.trim(),
        &password_hash,
        payload.first_name.trim(),
        payload.last_name.trim(),
        payload.category,
        payload.qualifications.trim(),
    )
    .await?;

    Ok(Json(ProfileResponse {
        account_id: account.id,
        username: account.username,
        role: Role::Provider,
        display_name: provider.display_name(),
    }))
}

/// Credentials travel in the Authorization header; a successful login
/// reports the resolved role so the client can route to the right
/// dashboard.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
) -> Result<Json<LoginResponse>, AppError> {
    let display_name = match principal.role {
        Role::EndUser => profile::find_user_by_account(&state.db_pool, principal.account.id)
            .await?
            .map(|user| user.display_name()),
        Role::Provider => profile::find_provider_by_account(&state.db_pool, principal.account.id)
            .await?
            .map(|provider| provider.display_name()),
        Role::Administrator => Some(principal.account.username.clone()),
    }
    .ok_or_else(|| {
        SlotError::Authentication(
            "Your account is not properly configured. Please contact an administrator.".to_string(),
        )
    })?;

    Ok(Json(LoginResponse {
        account_id: principal.account.id,
        role: principal.role,
        display_name,
    }))
}

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError(SlotError::Validation(format!(
            "{} is required",
            field
        ))));
    }
    Ok(())
}
