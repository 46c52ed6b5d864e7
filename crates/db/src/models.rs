use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::models::booking::BookedAppointment;
use slotbook_core::models::dashboard::SlotSummary;
use slotbook_core::models::profile::{Category, ProviderProfile, UserProfile};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl DbUserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<DbUserProfile> for UserProfile {
    fn from(profile: DbUserProfile) -> Self {
        UserProfile {
            id: profile.id,
            account_id: profile.account_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProviderProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category: String,
    pub first_name: String,
    pub last_name: String,
    pub qualifications: String,
    pub created_at: DateTime<Utc>,
}

impl DbProviderProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// A stored category outside the closed set means the row was written
    /// past the registration validation; treat it as an invariant violation.
    pub fn category(&self) -> SlotResult<Category> {
        parse_category(&self.category)
    }

    pub fn to_profile(&self) -> SlotResult<ProviderProfile> {
        Ok(ProviderProfile {
            id: self.id,
            account_id: self.account_id,
            category: self.category()?,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            qualifications: self.qualifications.clone(),
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAdminProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointmentSlot {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub provider_first_name: String,
    pub provider_last_name: String,
    pub category: String,
    pub appointment_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

impl DbAppointmentSlot {
    pub fn provider_name(&self) -> String {
        format!("{} {}", self.provider_first_name, self.provider_last_name)
    }

    pub fn category(&self) -> SlotResult<Category> {
        parse_category(&self.category)
    }

    pub fn to_summary(&self, user_name: Option<String>) -> SlotResult<SlotSummary> {
        Ok(SlotSummary {
            id: self.id,
            appointment_name: self.appointment_name.clone(),
            provider_name: self.provider_name(),
            user_name,
            category: self.category()?,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_booked: self.is_booked,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub user_id: Uuid,
    pub booked_at: DateTime<Utc>,
}

/// Slot row joined with the booked user's name, for provider and admin
/// listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlotWithUser {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub provider_first_name: String,
    pub provider_last_name: String,
    pub category: String,
    pub appointment_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
}

impl DbSlotWithUser {
    pub fn user_name(&self) -> Option<String> {
        match (&self.user_first_name, &self.user_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }

    pub fn to_summary(&self) -> SlotResult<SlotSummary> {
        Ok(SlotSummary {
            id: self.id,
            appointment_name: self.appointment_name.clone(),
            provider_name: format!("{} {}", self.provider_first_name, self.provider_last_name),
            user_name: self.user_name(),
            category: parse_category(&self.category)?,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_booked: self.is_booked,
        })
    }
}

/// Booking row joined with its slot's details, for the user dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookedSlot {
    pub booking_id: Uuid,
    pub slot_id: Uuid,
    pub appointment_name: String,
    pub provider_first_name: String,
    pub provider_last_name: String,
    pub category: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_at: DateTime<Utc>,
}

impl DbBookedSlot {
    pub fn to_booked_appointment(&self) -> SlotResult<BookedAppointment> {
        Ok(BookedAppointment {
            booking_id: self.booking_id,
            slot_id: self.slot_id,
            appointment_name: self.appointment_name.clone(),
            provider_name: format!("{} {}", self.provider_first_name, self.provider_last_name),
            category: parse_category(&self.category)?,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            booked_at: self.booked_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbNotice {
    pub seq: i64,
    pub owner_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

fn parse_category(value: &str) -> SlotResult<Category> {
    Category::parse(value)
        .ok_or_else(|| SlotError::Internal(format!("Unknown stored category: {}", value).into()))
}
