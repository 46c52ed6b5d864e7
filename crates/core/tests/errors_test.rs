use std::error::Error;

use slotbook_core::errors::{SlotError, SlotResult};

#[test]
fn test_slot_error_display() {
    let not_found = SlotError::NotFound("Slot not found".to_string());
    let validation = SlotError::Validation("End time must be after start time".to_string());
    let conflict = SlotError::Conflict("Overlaps an existing slot".to_string());
    let already_booked = SlotError::AlreadyBooked("Slot was booked first".to_string());
    let self_conflict = SlotError::SelfConflict("You already have 'Checkup'".to_string());
    let expired = SlotError::Expired("Slot is in the past".to_string());
    let authentication = SlotError::Authentication("Invalid username or password".to_string());
    let forbidden = SlotError::Forbidden("Providers only".to_string());
    let database = SlotError::Database(eyre::eyre!("Database connection failed"));

    assert_eq!(not_found.to_string(), "Resource not found: Slot not found");
    assert_eq!(
        validation.to_string(),
        "Validation error: End time must be after start time"
    );
    assert_eq!(
        conflict.to_string(),
        "Slot conflict: Overlaps an existing slot"
    );
    assert_eq!(
        already_booked.to_string(),
        "Already booked: Slot was booked first"
    );
    assert_eq!(
        self_conflict.to_string(),
        "Conflicting appointment: You already have 'Checkup'"
    );
    assert_eq!(expired.to_string(), "Slot expired: Slot is in the past");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Invalid username or password"
    );
    assert_eq!(forbidden.to_string(), "Access denied: Providers only");
    assert!(database.to_string().contains("Database error:"));
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let slot_error = SlotError::Internal(Box::new(io_error));

    assert!(slot_error.source().is_some());
}

#[test]
fn test_slot_result() {
    let result: SlotResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: SlotResult<i32> = Err(SlotError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_trait_implementation() {
    let eyre_error = eyre::eyre!("Database error");
    let slot_error = SlotError::Database(eyre_error);

    assert!(slot_error.to_string().contains("Database error"));
}

#[test]
fn test_box_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let boxed_error: Box<dyn Error + Send + Sync> = Box::new(io_error);
    let slot_error = SlotError::Internal(boxed_error);

    assert!(slot_error.to_string().contains("IO error"));
}
