use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role tag resolved once at authentication time and carried explicitly
/// through every call context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    EndUser,
    Provider,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::EndUser => "end_user",
            Role::Provider => "provider",
            Role::Administrator => "administrator",
        }
    }
}

/// Closed set of service categories a provider registers under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Medical,
    Beauty,
    Fitness,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Medical, Category::Beauty, Category::Fitness];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medical => "medical",
            Category::Beauty => "beauty",
            Category::Fitness => "fitness",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        match value.trim().to_ascii_lowercase().as_str() {
            "medical" => Some(Category::Medical),
            "beauty" => Some(Category::Beauty),
            "fitness" => Some(Category::Fitness),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category: Category,
    pub first_name: String,
    pub last_name: String,
    pub qualifications: String,
    pub created_at: DateTime<Utc>,
}

impl ProviderProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProviderRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub category: Category,
    pub qualifications: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub account_id: Uuid,
    pub username: String,
    pub role: Role,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub account_id: Uuid,
    pub role: Role,
    pub display_name: String,
}
