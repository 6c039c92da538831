//! User and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kitchen staff roles.
///
/// Admin manages user accounts and may do everything the other roles can;
/// managers manage products, recipes and reports; chefs serve meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Chef,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Chef => "chef",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "manager" => Some(UserRole::Manager),
            "chef" => Some(UserRole::Chef),
            _ => None,
        }
    }

    /// Products, recipes, deliveries, reports and alerts
    pub fn can_manage_kitchen(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }

    /// Serving meals and deducting stock
    pub fn can_serve(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Chef)
    }

    /// User account administration
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// A staff account, as returned by the API (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// Input for updating a user (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [UserRole::Admin, UserRole::Manager, UserRole::Chef] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("cook"), None);
    }

    #[test]
    fn role_policy_access_rules() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(UserRole::Admin.can_manage_kitchen());
        assert!(UserRole::Admin.can_serve());

        assert!(!UserRole::Manager.can_manage_users());
        assert!(UserRole::Manager.can_manage_kitchen());
        assert!(!UserRole::Manager.can_serve());

        assert!(!UserRole::Chef.can_manage_users());
        assert!(!UserRole::Chef.can_manage_kitchen());
        assert!(UserRole::Chef.can_serve());
    }
}
