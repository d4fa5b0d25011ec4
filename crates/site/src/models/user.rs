//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use tiffin_core::{Email, UserId};

/// A site user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name shown in the navigation and carried onto orders.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Whether the user can manage the menu.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
