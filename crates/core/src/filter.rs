//! Dashboard table filtering: free-text search plus category and exact-date
//! narrowing. Matching is case-insensitive substring over the appointment
//! name, provider name, and booked user name combined.

use chrono::NaiveDate;

use crate::models::dashboard::SlotSummary;
use crate::models::profile::{Category, ProviderProfile, UserProfile};

#[derive(Debug, Clone, Default)]
pub struct SlotFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

impl SlotFilter {
    pub fn matches(&self, slot: &SlotSummary) -> bool {
        self.matches_parts(
            &slot.appointment_name,
            &slot.provider_name,
            slot.user_name.as_deref(),
            slot.category,
            slot.date,
        )
    }

    /// Field-level variant for rows that are not `SlotSummary` shaped,
    /// like a user's booked-appointment listing.
    pub fn matches_parts(
        &self,
        appointment_name: &str,
        provider_name: &str,
        user_name: Option<&str>,
        category: Category,
        date: NaiveDate,
    ) -> bool {
        if let Some(search) = normalized(&self.search) {
            let combined = format!(
                "{} {} {}",
                appointment_name,
                user_name.unwrap_or("Unbooked"),
                provider_name,
            )
            .to_lowercase();
            if !combined.contains(&search) {
                return false;
            }
        }
        if let Some(wanted) = self.category {
            if category != wanted {
                return false;
            }
        }
        if let Some(wanted) = self.date {
            if date != wanted {
                return false;
            }
        }
        true
    }
}

/// Admin directory filtering over registered users and providers. The
/// category filter only ever narrows providers; users have no category and
/// are dropped when one is set.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
}

impl DirectoryFilter {
    pub fn matches_user(&self, user: &UserProfile) -> bool {
        if self.category.is_some() {
            return false;
        }
        match normalized(&self.search) {
            Some(search) => user.display_name().to_lowercase().contains(&search),
            None => true,
        }
    }

    pub fn matches_provider(&self, provider: &ProviderProfile) -> bool {
        if let Some(category) = self.category {
            if provider.category != category {
                return false;
            }
        }
        match normalized(&self.search) {
            Some(search) => provider.display_name().to_lowercase().contains(&search),
            None => true,
        }
    }
}

fn normalized(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Distinct, sorted categories present in a listing, for filter dropdowns.
pub fn categories_of(slots: &[SlotSummary]) -> Vec<Category> {
    let mut categories: Vec<Category> = slots.iter().map(|s| s.category).collect();
    categories.sort();
    categories.dedup();
    categories
}
