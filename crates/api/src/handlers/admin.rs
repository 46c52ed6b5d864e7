//! Administrator audit and moderation. The appointments view is the one
//! place expired slots remain visible.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::filter::{categories_of, DirectoryFilter, SlotFilter};
use slotbook_core::models::dashboard::{AdminAppointmentsResponse, AdminDirectoryResponse};
use slotbook_core::models::profile::{ProviderProfile, Role, UserProfile};
use slotbook_db::repositories::{profile, slot};
use std::sync::Arc;

use crate::{
    handlers::dashboard::parse_category,
    middleware::{auth::Principal, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub view: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub date: Option<chrono::NaiveDate>,
}

/// `?view=appointments` (default) lists every slot in the system,
/// expired ones included; `?view=users` lists the registered user and
/// provider directory.
#[axum::debug_handler]
pub async fn admin_dashboard(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Query(query): Query<AdminQuery>,
) -> Result<Response, AppError> {
    require_admin(&principal)?;

    if query.view.as_deref() == Some("users") {
        let filter = DirectoryFilter {
            search: query.search.clone(),
            category: parse_category(&query.category)?,
        };

        let users: Vec<UserProfile> = profile::list_users(&state.db_pool)
            .await?
            .into_iter()
            .map(UserProfile::from)
            .filter(|user| filter.matches_user(user))
            .collect();

        let providers: Vec<ProviderProfile> = profile::list_providers(&state.db_pool)
            .await?
            .iter()
            .map(|provider| provider.to_profile())
            .collect::<SlotResult<Vec<_>>>()?
            .into_iter()
            .filter(|provider| filter.matches_provider(provider))
            .collect();

        return Ok(Json(AdminDirectoryResponse { users, providers }).into_response());
    }

    let filter = SlotFilter {
        search: query.search.clone(),
        category: parse_category(&query.category)?,
        date: query.date,
    };

    // Audit view: no expiry filtering here
    let mut slots = Vec::new();
    for row in slot::list_all(&state.db_pool).await? {
        let summary = row.to_summary()?;
        if filter.matches(&summary) {
            slots.push(summary);
        }
    }

    let categories = categories_of(&slots);

    Ok(Json(AdminAppointmentsResponse { slots, categories }).into_response())
}

/// Removes a user or provider account along with its scheduling state.
#[axum::debug_handler]
pub async fn delete_account(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&principal)?;

    profile::delete_account(&state.db_pool, &username).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn require_admin(principal: &Principal) -> Result<(), AppError> {
    if principal.role != Role::Administrator {
        return Err(AppError(SlotError::Forbidden(
            "This page is for administrators only".to_string(),
        )));
    }
    Ok(())
}
