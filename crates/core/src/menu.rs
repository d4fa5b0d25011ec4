//! Menu item model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::MenuItemId;

/// A dish on the menu.
///
/// Prices are exact decimal amounts, never floats. `special_day` holds an
/// English weekday name ("Monday", "Tuesday", ...) when the item is that
/// day's special, or `None` for regular items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Image URL or path, possibly empty.
    pub image: String,
    pub special_day: Option<String>,
}

impl MenuItem {
    /// Whether this item is the special for the given weekday name.
    ///
    /// Comparison is case-insensitive so stored values like "monday" still
    /// match `chrono`'s "Monday".
    #[must_use]
    pub fn is_special_on(&self, weekday: &str) -> bool {
        self.special_day
            .as_deref()
            .is_some_and(|day| day.eq_ignore_ascii_case(weekday))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(special_day: Option<&str>) -> MenuItem {
        MenuItem {
            id: MenuItemId::new("item1"),
            name: "Masala Dosa".to_string(),
            description: "Crisp rice crepe".to_string(),
            price: Decimal::new(850, 2),
            image: String::new(),
            special_day: special_day.map(ToString::to_string),
        }
    }

    #[test]
    fn test_special_day_matches_case_insensitively() {
        let item = item(Some("monday"));
        assert!(item.is_special_on("Monday"));
        assert!(item.is_special_on("MONDAY"));
        assert!(!item.is_special_on("Tuesday"));
    }

    #[test]
    fn test_no_special_day_never_matches() {
        let item = item(None);
        assert!(!item.is_special_on("Monday"));
    }

    #[test]
    fn test_serde_keeps_price_exact() {
        let item = item(None);
        let json = serde_json::to_string(&item).unwrap();
        // serde-with-str keeps decimals as strings
        assert!(json.contains("\"8.50\""));

        let back: MenuItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
