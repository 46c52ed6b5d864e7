//! Slot Registry: appointment-slot lifecycle. Creation validates the
//! provider's no-overlap invariant inside the insert transaction; deletion
//! composes the cancellation notices and removes any booking in the same
//! transaction as the slot row.

use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::models::slot::CreateSlotRequest;
use slotbook_core::{notices, schedule};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::db_err;
use crate::models::{DbAppointmentSlot, DbBooking, DbProviderProfile, DbSlotWithUser, DbUserProfile};
use crate::repositories::mailbox;

/// Who is removing a slot. Providers may only remove their own; an
/// administrator may remove any.
pub enum DeleteActor<'a> {
    Provider(&'a DbProviderProfile),
    Administrator,
}

pub async fn create_slot(
    pool: &Pool<Postgres>,
    provider: &DbProviderProfile,
    request: &CreateSlotRequest,
) -> SlotResult<DbAppointmentSlot> {
    let appointment_name = request.appointment_name.trim();
    if appointment_name.is_empty() {
        return Err(SlotError::Validation(
            "Appointment name is required".to_string(),
        ));
    }
    schedule::validate_interval(request.start_time, request.end_time)?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    // Scan the provider's same-date slots inside the insert transaction so
    // two concurrent creations cannot both pass the overlap check. The
    // locked rows cover the scan; the insert commits with it.
    let existing = sqlx::query_as::<_, DbAppointmentSlot>(
        r#"
        SELECT id, provider_id, provider_first_name, provider_last_name, category,
               appointment_name, date, start_time, end_time, is_booked, created_at
        FROM appointment_slots
        WHERE provider_id = $1 AND date = $2
        FOR UPDATE
        "#,
    )
    .bind(provider.id)
    .bind(request.date)
    .fetch_all(&mut *tx)
    .await
    .map_err(db_err)?;

    for slot in &existing {
        if schedule::overlaps(
            request.start_time,
            request.end_time,
            slot.start_time,
            slot.end_time,
        ) {
            return Err(SlotError::Conflict(format!(
                "Overlaps your existing slot '{}' at {} on {}",
                slot.appointment_name,
                schedule::format_time_range(slot.start_time, slot.end_time),
                schedule::format_date(slot.date),
            )));
        }
    }

    let slot = sqlx::query_as::<_, DbAppointmentSlot>(
        r#"
        INSERT INTO appointment_slots
            (provider_id, provider_first_name, provider_last_name, category,
             appointment_name, date, start_time, end_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, provider_id, provider_first_name, provider_last_name, category,
                  appointment_name, date, start_time, end_time, is_booked, created_at
        "#,
    )
    .bind(provider.id)
    .bind(&provider.first_name)
    .bind(&provider.last_name)
    .bind(&provider.category)
    .bind(appointment_name)
    .bind(request.date)
    .bind(request.start_time)
    .bind(request.end_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!("Created slot {} for provider {}", slot.id, provider.id);
    Ok(slot)
}

/// Removes a slot, cancelling any live booking on it. A slot that is
/// already gone counts as success. The booked user always learns who
/// canceled; an administrator removal also notifies the owning provider.
pub async fn delete_slot(
    pool: &Pool<Postgres>,
    actor: DeleteActor<'_>,
    slot_id: Uuid,
) -> SlotResult<()> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let slot = sqlx::query_as::<_, DbAppointmentSlot>(
        r#"
        SELECT id, provider_id, provider_first_name, provider_last_name, category,
               appointment_name, date, start_time, end_time, is_booked, created_at
        FROM appointment_slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?;

    let Some(slot) = slot else {
        tracing::debug!("Slot {} already gone; treating delete as success", slot_id);
        return Ok(());
    };

    if let DeleteActor::Provider(provider) = &actor {
        if slot.provider_id != provider.id {
            return Err(SlotError::Forbidden(
                "You do not own this appointment slot".to_string(),
            ));
        }
    }

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, slot_id, user_id, booked_at
        FROM bookings
        WHERE slot_id = $1
        "#,
    )
    .bind(slot.id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?;

    let booked_user = match &booking {
        Some(booking) => sqlx::query_as::<_, DbUserProfile>(
            r#"
            SELECT id, account_id, first_name, last_name, created_at
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(booking.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?,
        None => None,
    };

    match (&actor, &booked_user) {
        (DeleteActor::Provider(_), Some(user)) => {
            let body = notices::canceled_by_provider(
                &slot.appointment_name,
                &slot.provider_first_name,
                &slot.provider_last_name,
                slot.date,
                slot.start_time,
                slot.end_time,
            );
            mailbox::enqueue(&mut *tx, user.id, &body).await?;
        }
        (DeleteActor::Administrator, Some(user)) => {
            let body = notices::canceled_by_admin_for_user(
                &slot.appointment_name,
                &slot.provider_name(),
                slot.date,
                slot.start_time,
                slot.end_time,
            );
            mailbox::enqueue(&mut *tx, user.id, &body).await?;

            if let Some(owner_id) = provider_mailbox(&mut tx, slot.provider_id).await? {
                let body = notices::canceled_by_admin_for_provider(
                    &slot.appointment_name,
                    Some(&user.display_name()),
                    slot.date,
                    slot.start_time,
                    slot.end_time,
                );
                mailbox::enqueue(&mut *tx, owner_id, &body).await?;
            }
        }
        (DeleteActor::Administrator, None) => {
            if let Some(owner_id) = provider_mailbox(&mut tx, slot.provider_id).await? {
                let body = notices::canceled_by_admin_for_provider(
                    &slot.appointment_name,
                    None,
                    slot.date,
                    slot.start_time,
                    slot.end_time,
                );
                mailbox::enqueue(&mut *tx, owner_id, &body).await?;
            }
        }
        (DeleteActor::Provider(_), None) => {}
    }

    if booking.is_some() {
        sqlx::query(
            r#"
            DELETE FROM bookings
            WHERE slot_id = $1
            "#,
        )
        .bind(slot.id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
    }

    sqlx::query(
        r#"
        DELETE FROM appointment_slots
        WHERE id = $1
        "#,
    )
    .bind(slot.id)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!("Deleted slot {}", slot_id);
    Ok(())
}

async fn provider_mailbox(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    provider_id: Uuid,
) -> SlotResult<Option<Uuid>> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM provider_profiles
        WHERE id = $1
        "#,
    )
    .bind(provider_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(id)
}

pub async fn get_slot(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
) -> SlotResult<Option<DbAppointmentSlot>> {
    let slot = sqlx::query_as::<_, DbAppointmentSlot>(
        r#"
        SELECT id, provider_id, provider_first_name, provider_last_name, category,
               appointment_name, date, start_time, end_time, is_booked, created_at
        FROM appointment_slots
        WHERE id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    Ok(slot)
}

pub async fn list_by_provider(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
) -> SlotResult<Vec<DbSlotWithUser>> {
    let slots = sqlx::query_as::<_, DbSlotWithUser>(
        r#"
        SELECT s.id, s.provider_id, s.provider_first_name, s.provider_last_name, s.category,
               s.appointment_name, s.date, s.start_time, s.end_time, s.is_booked, s.created_at,
               u.first_name AS user_first_name, u.last_name AS user_last_name
        FROM appointment_slots s
        LEFT JOIN bookings b ON b.slot_id = s.id
        LEFT JOIN user_profiles u ON u.id = b.user_id
        WHERE s.provider_id = $1
        ORDER BY s.date ASC, s.start_time ASC
        "#,
    )
    .bind(provider_id)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(slots)
}

pub async fn list_unbooked(pool: &Pool<Postgres>) -> SlotResult<Vec<DbAppointmentSlot>> {
    let slots = sqlx::query_as::<_, DbAppointmentSlot>(
        r#"
        SELECT id, provider_id, provider_first_name, provider_last_name, category,
               appointment_name, date, start_time, end_time, is_booked, created_at
        FROM appointment_slots
        WHERE is_booked = FALSE
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(slots)
}

/// Administrator audit listing: every slot, booked or not, expired or not.
pub async fn list_all(pool: &Pool<Postgres>) -> SlotResult<Vec<DbSlotWithUser>> {
    let slots = sqlx::query_as::<_, DbSlotWithUser>(
        r#"
        SELECT s.id, s.provider_id, s.provider_first_name, s.provider_last_name, s.category,
               s.appointment_name, s.date, s.start_time, s.end_time, s.is_booked, s.created_at,
               u.first_name AS user_first_name, u.last_name AS user_last_name
        FROM appointment_slots s
        LEFT JOIN bookings b ON b.slot_id = s.id
        LEFT JOIN user_profiles u ON u.id = b.user_id
        ORDER BY s.date ASC, s.start_time ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(slots)
}
