//! Slot publishing and removal, fronting the Slot Registry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::models::profile::Role;
use slotbook_core::models::slot::{CreateSlotRequest, SlotResponse};
use slotbook_db::models::DbAppointmentSlot;
use slotbook_db::repositories::{
    profile,
    slot::{self, DeleteActor},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{auth::Principal, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    if principal.role != Role::Provider {
        return Err(AppError(SlotError::Forbidden(
            "Only service providers can publish appointment slots".to_string(),
        )));
    }

    let provider = provider_profile(&state, &principal).await?;
    let slot = slot::create_slot(&state.db_pool, &provider, &payload).await?;

    Ok(Json(slot_response(&slot)?))
}

/// Removing a slot cancels any booking on it. Providers may remove their
/// own slots; administrators may remove any slot.
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
    Path(slot_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    match principal.role {
        Role::Provider => {
            let provider = provider_profile(&state, &principal).await?;
            slot::delete_slot(&state.db_pool, DeleteActor::Provider(&provider), slot_id).await?;
        }
        Role::Administrator => {
            slot::delete_slot(&state.db_pool, DeleteActor::Administrator, slot_id).await?;
        }
        Role::EndUser => {
            return Err(AppError(SlotError::Forbidden(
                "Users cancel bookings, not slots".to_string(),
            )));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn provider_profile(
    state: &Arc<ApiState>,
    principal: &Principal,
) -> Result<slotbook_db::models::DbProviderProfile, AppError> {
    profile::find_provider_by_account(&state.db_pool, principal.account.id)
        .await?
        .ok_or_else(|| {
            AppError(SlotError::Forbidden(
                "You are not registered as a provider".to_string(),
            ))
        })
}

pub(crate) fn slot_response(slot: &DbAppointmentSlot) -> SlotResult<SlotResponse> {
    Ok(SlotResponse {
        id: slot.id,
        appointment_name: slot.appointment_name.clone(),
        provider_name: slot.provider_name(),
        category: slot.category()?,
        date: slot.date,
        start_time: slot.start_time,
        end_time: slot.end_time,
        is_booked: slot.is_booked,
    })
}
