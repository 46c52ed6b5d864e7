//! Pure scheduling rules: interval overlap, expiry, and the display
//! formatting shared by dashboards and cancellation notices.
//!
//! Slot intervals are half-open `[start, end)`, so two slots that merely
//! touch at a boundary do not conflict.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::{SlotError, SlotResult};

/// Overlap test for two half-open intervals on the same date.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// A slot is expired once its date is past, or its end time has passed on
/// the current date. Expiry is computed on read; nothing sweeps old rows.
pub fn is_expired(date: NaiveDate, end_time: NaiveTime, now: NaiveDateTime) -> bool {
    date < now.date() || (date == now.date() && end_time <= now.time())
}

/// Rejects degenerate or inverted intervals before they reach storage.
pub fn validate_interval(start: NaiveTime, end: NaiveTime) -> SlotResult<()> {
    if end <= start {
        return Err(SlotError::Validation(
            "End time must be after start time".to_string(),
        ));
    }
    Ok(())
}

/// 12-hour clock without a leading zero, e.g. "9:30 AM".
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

pub fn format_time_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{}-{}", format_clock(start), format_clock(end))
}
