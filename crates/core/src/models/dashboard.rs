use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::booking::BookedAppointment;
use super::profile::{Category, ProviderProfile, UserProfile};

/// One row of a dashboard appointment table. `user_name` is `None` for
/// unbooked slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSummary {
    pub id: Uuid,
    pub appointment_name: String,
    pub provider_name: String,
    pub user_name: Option<String>,
    pub category: Category,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDashboardResponse {
    pub notices: Vec<String>,
    pub bookings: Vec<BookedAppointment>,
    pub open_slots: Vec<SlotSummary>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDashboardResponse {
    pub notices: Vec<String>,
    pub slots: Vec<SlotSummary>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAppointmentsResponse {
    pub slots: Vec<SlotSummary>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDirectoryResponse {
    pub users: Vec<UserProfile>,
    pub providers: Vec<ProviderProfile>,
}
