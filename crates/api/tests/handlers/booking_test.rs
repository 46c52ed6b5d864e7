use chrono::NaiveDateTime;
use pretty_assertions::assert_eq;
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::schedule;
use slotbook_db::models::{DbAppointmentSlot, DbBooking, DbUserProfile};

use crate::test_utils::{
    booking_fixture, date, provider_fixture, slot_fixture, time, user_fixture, TestContext,
};

// Mirrors the Booking Ledger's decision sequence (expiry, double-check,
// self-overlap scan) over in-memory state.
fn try_book(
    user: &DbUserProfile,
    slot: &DbAppointmentSlot,
    users_same_day_slots: &[DbAppointmentSlot],
    now: NaiveDateTime,
) -> SlotResult<DbBooking> {
    if schedule::is_expired(slot.date, slot.end_time, now) {
        return Err(SlotError::Expired(
            "This appointment is in the past".to_string(),
        ));
    }

    if slot.is_booked {
        return Err(SlotError::AlreadyBooked(
            "Sorry, this appointment has already been booked.".to_string(),
        ));
    }

    for booked in users_same_day_slots {
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

    Ok(booking_fixture(slot, user))
}

fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
}

#[test]
fn test_two_bookers_one_winner() {
    let provider = provider_fixture();
    let alice = user_fixture();
    let bob = user_fixture();
    let mut slot = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(9, 0),
        time(9, 30),
    );
    let now = noon(2025, 6, 1);

    // First request wins and flips the booked flag
    let booking = try_book(&alice, &slot, &[], now).unwrap();
    assert_eq!(booking.slot_id, slot.id);
    assert_eq!(booking.user_id, alice.id);
    slot.is_booked = true;

    // The loser re-reads under the lock and sees the flag
    let result = try_book(&bob, &slot, &[], now);
    assert!(matches!(result, Err(SlotError::AlreadyBooked(_))));
}

#[test]
fn test_user_cannot_double_book_overlapping_times() {
    let provider = provider_fixture();
    let other_provider = provider_fixture();
    let user = user_fixture();
    let now = noon(2025, 5, 1);

    // Already booked: [09:00, 10:00) on 2025-06-01
    let held = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 6, 1),
        time(9, 0),
        time(10, 0),
    );

    // Overlapping slot from a different provider still conflicts
    let overlapping = slot_fixture(
        &other_provider,
        "Massage",
        date(2025, 6, 1),
        time(9, 30),
        time(10, 30),
    );
    let result = try_book(&user, &overlapping, std::slice::from_ref(&held), now);
    match result {
        Err(SlotError::SelfConflict(message)) => {
            assert!(message.contains("Checkup"));
            assert!(message.contains("9:00 AM"));
        }
        other => panic!("Expected SelfConflict, got {:?}", other.map(|_| ())),
    }

    // Back-to-back is allowed: [10:00, 11:00) touches but does not overlap
    let adjacent = slot_fixture(
        &other_provider,
        "Massage",
        date(2025, 6, 1),
        time(10, 0),
        time(11, 0),
    );
    assert!(try_book(&user, &adjacent, std::slice::from_ref(&held), now).is_ok());
}

#[test]
fn test_expired_slot_cannot_be_booked() {
    let provider = provider_fixture();
    let user = user_fixture();

    let yesterday = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 6, 30),
        time(9, 0),
        time(9, 30),
    );
    let result = try_book(&user, &yesterday, &[], noon(2025, 7, 1));
    assert!(matches!(result, Err(SlotError::Expired(_))));

    // Ended earlier today counts as expired too
    let this_morning = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(9, 0),
        time(9, 30),
    );
    let result = try_book(&user, &this_morning, &[], noon(2025, 7, 1));
    assert!(matches!(result, Err(SlotError::Expired(_))));
}

#[tokio::test]
async fn test_cancel_requires_booking_owner() {
    let mut ctx = TestContext::new();
    let provider = provider_fixture();
    let owner = user_fixture();
    let stranger = user_fixture();
    let slot = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(9, 0),
        time(9, 30),
    );

    let owner_id = owner.id;
    ctx.booking_repo
        .expect_cancel_by_user()
        .times(2)
        .returning(move |user, _| {
            if user.id == owner_id {
                Ok(())
            } else {
                Err(SlotError::Forbidden(
                    "This booking belongs to another user".to_string(),
                ))
            }
        });

    let result = ctx.booking_repo.cancel_by_user(stranger, slot.id).await;
    assert!(matches!(result, Err(SlotError::Forbidden(_))));

    assert!(ctx.booking_repo.cancel_by_user(owner, slot.id).await.is_ok());
}

#[tokio::test]
async fn test_booked_flag_and_booking_stay_in_step() {
    let mut ctx = TestContext::new();
    let provider = provider_fixture();
    let user = user_fixture();
    let mut slot = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(9, 0),
        time(9, 30),
    );
    let booking = booking_fixture(&slot, &user);

    // After booking: flag set and exactly one booking row
    slot.is_booked = true;
    let found = booking.clone();
    ctx.booking_repo
        .expect_find_by_slot()
        .times(1)
        .returning(move |_| Ok(Some(found.clone())));
    assert_eq!(slot.is_booked, {
        let live = ctx.booking_repo.find_by_slot(slot.id).await.unwrap();
        live.is_some()
    });

    // After user cancellation: flag cleared and the booking row gone
    slot.is_booked = false;
    ctx.booking_repo
        .expect_find_by_slot()
        .times(1)
        .returning(|_| Ok(None));
    assert_eq!(slot.is_booked, {
        let live = ctx.booking_repo.find_by_slot(slot.id).await.unwrap();
        live.is_some()
    });
}
