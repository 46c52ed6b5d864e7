//! Booking and cancellation, fronting the Booking Ledger.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use slotbook_core::errors::SlotError;
use slotbook_core::models::booking::BookingResponse;
use slotbook_core::models::profile::Role;
use slotbook_db::repositories::{
    booking, profile,
    slot::{self, DeleteActor},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::slot::provider_profile,
    middleware::{auth::Principal, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    if principal.role != Role::EndUser {
        return Err(AppError(SlotError::Forbidden(
            "Only registered users can book appointments".to_string(),
        )));
    }

    let user = user_profile(&state, &principal).await?;
    let now = Utc::now().naive_utc();
    let booking = booking::book_slot(&state.db_pool, &user, slot_id, now).await?;

    Ok(Json(BookingResponse {
        id: booking.id,
        slot_id: booking.slot_id,
        booked_at: booking.booked_at,
    }))
}

/// Cancellation dispatches on the caller's role: a user cancellation
/// reopens the slot, while a provider or administrator cancellation
/// removes the slot entirely.
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Path(slot_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    match principal.role {
        Role::EndUser => {
            let user = user_profile(&state, &principal).await?;
            booking::cancel_by_user(&state.db_pool, &user, slot_id).await?;
        }
        Role::Provider => {
            let provider = provider_profile(&state, &principal).await?;
            slot::delete_slot(&state.db_pool, DeleteActor::Provider(&provider), slot_id).await?;
        }
        Role::Administrator => {
            slot::delete_slot(&state.db_pool, DeleteActor::Administrator, slot_id).await?;
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn user_profile(
    state: &Arc<ApiState>,
    principal: &Principal,
) -> Result<slotbook_db::models::DbUserProfile, AppError> {
    profile::find_user_by_account(&state.db_pool, principal.account.id)
        .await?
        .ok_or_else(|| {
            AppError(SlotError::Forbidden(
                "You are not registered as a user".to_string(),
            ))
        })
}
