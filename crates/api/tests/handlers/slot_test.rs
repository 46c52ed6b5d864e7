use mockall::predicate;
use pretty_assertions::assert_eq;
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::models::slot::CreateSlotRequest;
use slotbook_core::schedule;
use slotbook_db::models::DbAppointmentSlot;
use uuid::Uuid;

use crate::test_utils::{date, provider_fixture, slot_fixture, time, TestContext};

// Mirrors the Slot Registry's validation sequence over in-memory state so
// the rule ordering can be exercised without a live database.
fn try_create_slot(
    existing: &[DbAppointmentSlot],
    request: &CreateSlotRequest,
) -> SlotResult<()> {
    let appointment_name = request.appointment_name.trim();
    if appointment_name.is_empty() {
        return Err(SlotError::Validation(
            "Appointment name is required".to_string(),
        ));
    }
    schedule::validate_interval(request.start_time, request.end_time)?;

    for slot in existing {
        if slot.date == request.date
            && schedule::overlaps(
                request.start_time,
                request.end_time,
                slot.start_time,
                slot.end_time,
            )
        {
            return Err(SlotError::Conflict(format!(
                "Overlaps your existing slot '{}' at {} on {}",
                slot.appointment_name,
                schedule::format_time_range(slot.start_time, slot.end_time),
                schedule::format_date(slot.date),
            )));
        }
    }

    Ok(())
}

fn request(name: &str, start: (u32, u32), end: (u32, u32)) -> CreateSlotRequest {
    CreateSlotRequest {
        appointment_name: name.to_string(),
        date: date(2025, 7, 1),
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
    }
}

#[test]
fn test_overlapping_slot_rejected() {
    let provider = provider_fixture();
    let existing = vec![slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(10, 0),
        time(11, 0),
    )];

    let result = try_create_slot(&existing, &request("Follow-up", (10, 30), (11, 30)));
    match result {
        Err(SlotError::Conflict(message)) => {
            assert!(message.contains("Checkup"));
            assert!(message.contains("10:00 AM-11:00 AM"));
        }
        other => panic!("Expected Conflict, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_boundary_touching_slot_accepted() {
    let provider = provider_fixture();
    let existing = vec![slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(10, 0),
        time(11, 0),
    )];

    // [11:00, 12:00) touches [10:00, 11:00) but does not overlap it
    assert!(try_create_slot(&existing, &request("Follow-up", (11, 0), (12, 0))).is_ok());
}

#[test]
fn test_other_date_never_conflicts() {
    let provider = provider_fixture();
    let existing = vec![slot_fixture(
        &provider,
        "Checkup",
        date(2025, 6, 30),
        time(10, 0),
        time(11, 0),
    )];

    assert!(try_create_slot(&existing, &request("Follow-up", (10, 0), (11, 0))).is_ok());
}

#[test]
fn test_invalid_interval_rejected() {
    let result = try_create_slot(&[], &request("Checkup", (11, 0), (10, 0)));
    assert!(matches!(result, Err(SlotError::Validation(_))));

    let result = try_create_slot(&[], &request("Checkup", (11, 0), (11, 0)));
    assert!(matches!(result, Err(SlotError::Validation(_))));
}

#[test]
fn test_blank_appointment_name_rejected() {
    let result = try_create_slot(&[], &request("   ", (10, 0), (11, 0)));
    assert!(matches!(result, Err(SlotError::Validation(_))));
}

#[tokio::test]
async fn test_delete_slot_is_idempotent() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    // An already-removed slot still reports success to the caller
    ctx.slot_repo
        .expect_delete_slot()
        .with(predicate::eq(slot_id))
        .times(2)
        .returning(|_| Ok(()));

    assert!(ctx.slot_repo.delete_slot(slot_id).await.is_ok());
    assert!(ctx.slot_repo.delete_slot(slot_id).await.is_ok());
}

#[tokio::test]
async fn test_created_slot_starts_unbooked() {
    let mut ctx = TestContext::new();
    let provider = provider_fixture();
    let created = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(9, 0),
        time(9, 30),
    );

    let returned = created.clone();
    ctx.slot_repo
        .expect_create_slot()
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));

    let slot = ctx
        .slot_repo
        .create_slot(provider.clone(), request("Checkup", (9, 0), (9, 30)))
        .await
        .unwrap();

    assert!(!slot.is_booked);
    assert_eq!(slot.provider_id, provider.id);
    assert_eq!(slot.category, provider.category);
}
