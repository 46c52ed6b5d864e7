use chrono::{NaiveDate, NaiveTime, Utc};
use slotbook_db::mock::repositories::{
    MockBookingRepo, MockMailboxRepo, MockProfileRepo, MockSlotRepo,
};
use slotbook_db::models::{DbAppointmentSlot, DbBooking, DbProviderProfile, DbUserProfile};
use uuid::Uuid;

pub struct TestContext {
    // Mocks for each repository touched by the handlers
    pub slot_repo: MockSlotRepo,
    pub booking_repo: MockBookingRepo,
    pub mailbox_repo: MockMailboxRepo,
    pub profile_repo: MockProfileRepo,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            slot_repo: MockSlotRepo::new(),
            booking_repo: MockBookingRepo::new(),
            mailbox_repo: MockMailboxRepo::new(),
            profile_repo: MockProfileRepo::new(),
        }
    }
}

pub fn provider_fixture() -> DbProviderProfile {
    DbProviderProfile {
        id: Uuid::new_v4(),
        account_id: Uuid::new_v4(),
        category: "medical".to_string(),
        first_name: "Greg".to_string(),
        last_name: "House".to_string(),
        qualifications: "MD".to_string(),
        created_at: Utc::now(),
    }
}

pub fn user_fixture() -> DbUserProfile {
    DbUserProfile {
        id: Uuid::new_v4(),
        account_id: Uuid::new_v4(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        created_at: Utc::now(),
    }
}

pub fn slot_fixture(
    provider: &DbProviderProfile,
    name: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> DbAppointmentSlot {
    DbAppointmentSlot {
        id: Uuid::new_v4(),
        provider_id: provider.id,
        provider_first_name: provider.first_name.clone(),
        provider_last_name: provider.last_name.clone(),
        category: provider.category.clone(),
        appointment_name: name.to_string(),
        date,
        start_time: start,
        end_time: end,
        is_booked: false,
        created_at: Utc::now(),
    }
}

pub fn booking_fixture(slot: &DbAppointmentSlot, user: &DbUserProfile) -> DbBooking {
    DbBooking {
        id: Uuid::new_v4(),
        slot_id: slot.id,
        user_id: user.id,
        booked_at: Utc::now(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
