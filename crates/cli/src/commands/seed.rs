//! Seed the menu from a YAML file.
//!
//! This command reads menu items from a YAML file and inserts them into the
//! `menu_items` table, so a fresh deployment has something to sell.

use std::path::Path;

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{error, info};

use tiffin_site::db::menu::NewMenuItem;
use tiffin_site::db::{self, MenuRepository};

/// Weekday names accepted for `special_day`.
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Top-level structure of the seed file.
#[derive(Debug, Deserialize)]
pub struct MenuSeedFile {
    pub items: Vec<MenuSeedItem>,
}

/// One menu item in the seed file. Prices are YAML strings ("8.50") so they
/// deserialize as exact decimals.
#[derive(Debug, Deserialize)]
pub struct MenuSeedItem {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image: Option<String>,
    pub special_day: Option<String>,
}

/// Check a parsed seed file for problems worth stopping over.
fn validate_items(items: &[MenuSeedItem]) -> Vec<String> {
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;

        if item.name.trim().is_empty() {
            errors.push(format!("item {position}: name is empty"));
        }

        if item.price <= Decimal::ZERO {
            errors.push(format!(
                "item {position} ({}): price must be positive, got {}",
                item.name, item.price
            ));
        }

        if let Some(day) = &item.special_day {
            if !WEEKDAYS.iter().any(|known| known.eq_ignore_ascii_case(day)) {
                errors.push(format!(
                    "item {position} ({}): unknown weekday {day:?}",
                    item.name
                ));
            }
        }
    }

    errors
}

/// Seed menu items from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML seed file
/// * `clear_existing` - If true, delete all existing menu items first
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or parsed, or database operations fail.
pub async fn menu(file_path: &str, clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "SITE_DATABASE_URL not set")?;

    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading menu items from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: MenuSeedFile = serde_yaml::from_str(&content)?;

    info!(items = seed.items.len(), "Parsed seed file");

    let errors = validate_items(&seed.items);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    // Connect to database
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    if clear_existing {
        let result = sqlx::query("DELETE FROM menu_items").execute(&pool).await?;
        info!(deleted = result.rows_affected(), "Cleared existing menu");
    }

    let repository = MenuRepository::new(&pool);
    let mut inserted = 0usize;

    for item in seed.items {
        let created = repository
            .insert(NewMenuItem {
                name: item.name,
                description: item.description.unwrap_or_default(),
                price: item.price,
                image: item.image.unwrap_or_default(),
                special_day: item.special_day,
            })
            .await?;

        info!(item_id = %created.id, name = %created.name, "Inserted menu item");
        inserted += 1;
    }

    // Print summary
    info!("Seeding complete!");
    info!("  Items inserted: {inserted}");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_file_with_string_prices() {
        let yaml = r#"
items:
  - name: Dal Tadka
    description: Yellow lentils tempered with ghee and cumin.
    price: "8.50"
    special_day: Monday
  - name: Plain Roti
    price: "1.20"
"#;

        let seed: MenuSeedFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seed.items.len(), 2);

        let first = seed.items.first().unwrap();
        assert_eq!(first.name, "Dal Tadka");
        assert_eq!(first.price, Decimal::new(85, 1));
        assert_eq!(first.special_day.as_deref(), Some("Monday"));

        let second = seed.items.last().unwrap();
        assert_eq!(second.description, None);
        assert_eq!(second.image, None);
    }

    #[test]
    fn test_validate_rejects_bad_weekday_and_price() {
        let items = vec![
            MenuSeedItem {
                name: "Paneer Wrap".to_string(),
                description: None,
                price: Decimal::ZERO,
                image: None,
                special_day: Some("Funday".to_string()),
            },
            MenuSeedItem {
                name: String::new(),
                description: None,
                price: Decimal::new(500, 2),
                image: None,
                special_day: None,
            },
        ];

        let errors = validate_items(&items);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("price must be positive")));
        assert!(errors.iter().any(|e| e.contains("unknown weekday")));
        assert!(errors.iter().any(|e| e.contains("name is empty")));
    }

    #[test]
    fn test_validate_accepts_case_insensitive_weekday() {
        let items = vec![MenuSeedItem {
            name: "Thali".to_string(),
            description: None,
            price: Decimal::new(1250, 2),
            image: None,
            special_day: Some("friday".to_string()),
        }];

        assert!(validate_items(&items).is_empty());
    }
}
