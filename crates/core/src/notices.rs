//! Wording of the cancellation notices queued into profile mailboxes.
//! Kept in one place so the dashboard-facing strings stay consistent
//! across the user, provider, and administrator cancellation paths.

use chrono::{NaiveDate, NaiveTime};

use crate::schedule::{format_date, format_time_range};

/// To the provider, after a user gives up their booking. The slot stays
/// open for rebooking.
pub fn user_canceled(
    user_name: &str,
    appointment_name: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> String {
    format!(
        "{} canceled '{}' with you on {} at {}.",
        user_name,
        appointment_name,
        format_date(date),
        format_time_range(start, end),
    )
}

/// To the booked user, after the owning provider withdraws the slot.
pub fn canceled_by_provider(
    appointment_name: &str,
    provider_first_name: &str,
    provider_last_name: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> String {
    format!(
        "Your appointment '{}' with {} {} on {} at {} was canceled by {}.",
        appointment_name,
        provider_first_name,
        provider_last_name,
        format_date(date),
        format_time_range(start, end),
        provider_first_name,
    )
}

/// To the booked user, after an administrator removes the slot.
pub fn canceled_by_admin_for_user(
    appointment_name: &str,
    provider_name: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> String {
    format!(
        "Your appointment '{}' with {} on {} at {} was canceled by an administrator.",
        appointment_name,
        provider_name,
        format_date(date),
        format_time_range(start, end),
    )
}

/// To the owning provider, after an administrator removes one of their
/// slots. `user_name` is the booked user if there was one.
pub fn canceled_by_admin_for_provider(
    appointment_name: &str,
    user_name: Option<&str>,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> String {
    match user_name {
        Some(user_name) => format!(
            "Your appointment '{}' with {} on {} at {} was canceled by an administrator.",
            appointment_name,
            user_name,
            format_date(date),
            format_time_range(start, end),
        ),
        None => format!(
            "Your appointment '{}' on {} at {} was canceled by an administrator.",
            appointment_name,
            format_date(date),
            format_time_range(start, end),
        ),
    }
}
