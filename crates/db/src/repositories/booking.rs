//! Booking Ledger: the one-to-one link between a slot and the user who
//! reserved it. Booking is the racy path; the whole read-check-write runs
//! under row locks in a single transaction so the booked flag and the
//! booking row can never be observed out of step.

use chrono::NaiveDateTime;
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::{notices, schedule};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::db_err;
use crate::models::{DbAppointmentSlot, DbBookedSlot, DbBooking, DbUserProfile};
use crate::repositories::mailbox;

pub async fn book_slot(
    pool: &Pool<Postgres>,
    user: &DbUserProfile,
    slot_id: Uuid,
    now: NaiveDateTime,
) -> SlotResult<DbBooking> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    // Serialize this user's bookings so two of their own requests cannot
    // both pass the self-overlap scan
    sqlx::query(
        r#"
        SELECT id FROM user_profiles WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(user.id)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

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
    .map_err(db_err)?
    .ok_or_else(|| SlotError::NotFound("Appointment slot not found".to_string()))?;

    if schedule::is_expired(slot.date, slot.end_time, now) {
        return Err(SlotError::Expired(
            "This appointment is in the past".to_string(),
        ));
    }

    // Re-check under the row lock: losing the race to another booker is a
    // normal outcome, not a server error
    if slot.is_booked {
        return Err(SlotError::AlreadyBooked(
            "Sorry, this appointment has already been booked.".to_string(),
        ));
    }

    let same_day: Vec<DbAppointmentSlot> = sqlx::query_as(
        r#"
        SELECT s.id, s.provider_id, s.provider_first_name, s.provider_last_name, s.category,
               s.appointment_name, s.date, s.start_time, s.end_time, s.is_booked, s.created_at
        FROM appointment_slots s
        JOIN bookings b ON b.slot_id = s.id
        WHERE b.user_id = $1 AND s.date = $2
        "#,
    )
    .bind(user.id)
    .bind(slot.date)
    .fetch_all(&mut *tx)
    .await
    .map_err(db_err)?;

    for booked in &same_day {
        if schedule::overlaps(
            slot.start_time,
            slot.end_time,
            booked.start_time,
            booked.end_time,
        ) {
            return Err(SlotError::SelfConflict(format!(
                "You already have '{}' from {} to {} on {}.",
                booked.appointment_name,
                schedule::format_clock(booked.start_time),
                schedule::format_clock(booked.end_time),
                schedule::format_date(booked.date),
            )));
        }
    }

    sqlx::query(
        r#"
        UPDATE appointment_slots
        SET is_booked = TRUE
        WHERE id = $1
        "#,
    )
    .bind(slot.id)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (slot_id, user_id)
        VALUES ($1, $2)
        RETURNING id, slot_id, user_id, booked_at
        "#,
    )
    .bind(slot.id)
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!("User {} booked slot {}", user.id, slot.id);
    Ok(booking)
}

/// Self-service cancellation: the booking is removed, the slot reopens,
/// and the provider hears about it. The slot itself survives.
pub async fn cancel_by_user(
    pool: &Pool<Postgres>,
    user: &DbUserProfile,
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
    .map_err(db_err)?
    .ok_or_else(|| SlotError::NotFound("Appointment slot not found".to_string()))?;

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
    .map_err(db_err)?
    .ok_or_else(|| SlotError::NotFound("No booking exists for this slot".to_string()))?;

    if booking.user_id != user.id {
        return Err(SlotError::Forbidden(
            "This booking belongs to another user".to_string(),
        ));
    }

    let provider_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM provider_profiles WHERE id = $1
        "#,
    )
    .bind(slot.provider_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?;

    if let Some(provider_id) = provider_id {
        let body = notices::user_canceled(
            &user.display_name(),
            &slot.appointment_name,
            slot.date,
            slot.start_time,
            slot.end_time,
        );
        mailbox::enqueue(&mut *tx, provider_id, &body).await?;
    }

    sqlx::query(
        r#"
        DELETE FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(booking.id)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    sqlx::query(
        r#"
        UPDATE appointment_slots
        SET is_booked = FALSE
        WHERE id = $1
        "#,
    )
    .bind(slot.id)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!("User {} canceled booking on slot {}", user.id, slot.id);
    Ok(())
}

pub async fn find_by_slot(pool: &Pool<Postgres>, slot_id: Uuid) -> SlotResult<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, slot_id, user_id, booked_at
        FROM bookings
        WHERE slot_id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    Ok(booking)
}

pub async fn list_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> SlotResult<Vec<DbBookedSlot>> {
    let bookings = sqlx::query_as::<_, DbBookedSlot>(
        r#"
        SELECT b.id AS booking_id, s.id AS slot_id, s.appointment_name,
               s.provider_first_name, s.provider_last_name, s.category,
               s.date, s.start_time, s.end_time, b.booked_at
        FROM bookings b
        JOIN appointment_slots s ON s.id = b.slot_id
        WHERE b.user_id = $1
        ORDER BY s.date ASC, s.start_time ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(bookings)
}
