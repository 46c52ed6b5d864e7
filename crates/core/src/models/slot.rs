use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub provider_name: String,
    pub category: Category,
    pub appointment_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub appointment_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub appointment_name: String,
    pub provider_name: String,
    pub category: Category,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
}
