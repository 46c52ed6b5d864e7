use chrono::NaiveDateTime;
use mockall::mock;
use slotbook_core::errors::SlotResult;
use slotbook_core::models::profile::Category;
use slotbook_core::models::slot::CreateSlotRequest;
use uuid::Uuid;

use crate::models::{
    DbAccount, DbAppointmentSlot, DbBookedSlot, DbBooking, DbProviderProfile, DbSlotWithUser,
    DbUserProfile,
};

// Mock repositories for testing handler logic without a live database

mock! {
    pub SlotRepo {
        pub async fn create_slot(
            &self,
            provider: DbProviderProfile,
            request: CreateSlotRequest,
        ) -> SlotResult<DbAppointmentSlot>;

        pub async fn delete_slot(&self, slot_id: Uuid) -> SlotResult<()>;

        pub async fn get_slot(&self, slot_id: Uuid) -> SlotResult<Option<DbAppointmentSlot>>;

        pub async fn list_by_provider(&self, provider_id: Uuid) -> SlotResult<Vec<DbSlotWithUser>>;

        pub async fn list_unbooked(&self) -> SlotResult<Vec<DbAppointmentSlot>>;

        pub async fn list_all(&self) -> SlotResult<Vec<DbSlotWithUser>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn book_slot(
            &self,
            user: DbUserProfile,
            slot_id: Uuid,
            now: NaiveDateTime,
        ) -> SlotResult<DbBooking>;

        pub async fn cancel_by_user(&self, user: DbUserProfile, slot_id: Uuid) -> SlotResult<()>;

        pub async fn find_by_slot(&self, slot_id: Uuid) -> SlotResult<Option<DbBooking>>;

        pub async fn list_by_user(&self, user_id: Uuid) -> SlotResult<Vec<DbBookedSlot>>;
    }
}

mock! {
    pub MailboxRepo {
        pub async fn enqueue(&self, owner_id: Uuid, body: String) -> SlotResult<()>;

        pub async fn drain_all(&self, owner_id: Uuid) -> SlotResult<Vec<String>>;
    }
}

mock! {
    pub ProfileRepo {
        pub async fn register_user(
            &self,
            username: String,
            password_hash: String,
            first_name: String,
            last_name: String,
        ) -> SlotResult<(DbAccount, DbUserProfile)>;

        pub async fn register_provider(
            &self,
            username: String,
            password_hash: String,
            first_name: String,
            last_name: String,
            category: Category,
            qualifications: String,
        ) -> SlotResult<(DbAccount, DbProviderProfile)>;

        pub async fn find_user_by_account(
            &self,
            account_id: Uuid,
        ) -> SlotResult<Option<DbUserProfile>>;

        pub async fn find_provider_by_account(
            &self,
            account_id: Uuid,
        ) -> SlotResult<Option<DbProviderProfile>>;

        pub async fn delete_account(&self, username: String) -> SlotResult<()>;
    }
}
