use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub user_id: Uuid,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub booked_at: DateTime<Utc>,
}

/// A user's booking joined with the details of the slot it reserves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedAppointment {
    pub booking_id: Uuid,
    pub slot_id: Uuid,
    pub appointment_name: String,
    pub provider_name: String,
    pub category: Category,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_at: DateTime<Utc>,
}
