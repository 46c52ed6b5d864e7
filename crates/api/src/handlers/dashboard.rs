//! # Dashboard Handlers
//!
//! Read-side projections for the end-user and provider dashboards. Each
//! dashboard drains its profile's notice mailbox (a destructive read; the
//! notices are shown once), hides expired slots, and applies the caller's
//! search/category/date filters. Nothing here mutates scheduling state.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use slotbook_core::errors::SlotError;
use slotbook_core::filter::{categories_of, SlotFilter};
use slotbook_core::models::dashboard::{ProviderDashboardResponse, UserDashboardResponse};
use slotbook_core::models::profile::{Category, Role};
use slotbook_core::schedule;
use slotbook_db::repositories::{booking, mailbox, slot};
use std::sync::Arc;

use crate::{
    handlers::booking::user_profile,
    handlers::slot::provider_profile,
    middleware::{auth::Principal, error_handling::AppError},
    ApiState,
};

/// Filter parameters shared by the dashboard views. `booked_search` and
/// `booked_category` apply to the user's own bookings table.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub booked_search: Option<String>,
    pub booked_category: Option<String>,
}

#[axum::debug_handler]
pub async fn user_dashboard(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<UserDashboardResponse>, AppError> {
    if principal.role != Role::EndUser {
        return Err(AppError(SlotError::Forbidden(
            "This dashboard is for registered users only".to_string(),
        )));
    }
    let user = user_profile(&state, &principal).await?;

    // Destructive read: these notices are delivered exactly once
    let notices = mailbox::drain_all(&state.db_pool, user.id).await?;

    let now = Utc::now().naive_utc();

    let slot_filter = SlotFilter {
        search: query.search.clone(),
        category: parse_category(&query.category)?,
        date: query.date,
    };
    let booked_filter = SlotFilter {
        search: query.booked_search.clone(),
        category: parse_category(&query.booked_category)?,
        date: None,
    };

    let display_name = user.display_name();
    let mut bookings = Vec::new();
    for row in booking::list_by_user(&state.db_pool, user.id).await? {
        if schedule::is_expired(row.date, row.end_time, now) {
            continue;
        }
        let appointment = row.to_booked_appointment()?;
        if booked_filter.matches_parts(
            &appointment.appointment_name,
            &appointment.provider_name,
            Some(display_name.as_str()),
            appointment.category,
            appointment.date,
        ) {
            bookings.push(appointment);
        }
    }

    let mut open_slots = Vec::new();
    for row in slot::list_unbooked(&state.db_pool).await? {
        if schedule::is_expired(row.date, row.end_time, now) {
            continue;
        }
        let summary = row.to_summary(None)?;
        if slot_filter.matches(&summary) {
            open_slots.push(summary);
        }
    }

    let categories = categories_of(&open_slots);

    Ok(Json(UserDashboardResponse {
        notices,
        bookings,
        open_slots,
        categories,
    }))
}

#[axum::debug_handler]
pub async fn provider_dashboard(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ProviderDashboardResponse>, AppError> {
    if principal.role != Role::Provider {
        return Err(AppError(SlotError::Forbidden(
            "This dashboard is for service providers only".to_string(),
        )));
    }
    let provider = provider_profile(&state, &principal).await?;

    let notices = mailbox::drain_all(&state.db_pool, provider.id).await?;

    let now = Utc::now().naive_utc();
    let filter = SlotFilter {
        search: query.search.clone(),
        category: parse_category(&query.category)?,
        date: query.date,
    };

    let mut slots = Vec::new();
    for row in slot::list_by_provider(&state.db_pool, provider.id).await? {
        if schedule::is_expired(row.date, row.end_time, now) {
            continue;
        }
        let summary = row.to_summary()?;
        if filter.matches(&summary) {
            slots.push(summary);
        }
    }

    let categories = categories_of(&slots);

    Ok(Json(ProviderDashboardResponse {
        notices,
        slots,
        categories,
    }))
}

pub(crate) fn parse_category(raw: &Option<String>) -> Result<Option<Category>, AppError> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => Category::parse(value).map(Some).ok_or_else(|| {
            AppError(SlotError::Validation(format!(
                "Unknown category: {}",
                value
            )))
        }),
    }
}
