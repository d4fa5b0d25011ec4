//! Menu item repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use tiffin_core::{MenuItem, MenuItemId};

use super::RepositoryError;

/// Fields for a new menu item. The ID is generated on insert.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub special_day: Option<String>,
}

/// Partial update for a menu item. `None` fields keep their current value.
///
/// `special_day` uses the empty string to clear an existing special, since
/// HTML forms cannot send a missing-vs-null distinction.
#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub special_day: Option<String>,
}

/// Merge an update into an existing item.
fn apply_changes(existing: MenuItem, changes: MenuItemUpdate) -> MenuItem {
    MenuItem {
        id: existing.id,
        name: changes.name.unwrap_or(existing.name),
        description: changes.description.unwrap_or(existing.description),
        price: changes.price.unwrap_or(existing.price),
        image: changes.image.unwrap_or(existing.image),
        special_day: changes.special_day.map_or(existing.special_day, |day| {
            if day.is_empty() { None } else { Some(day) }
        }),
    }
}

/// Repository for menu item database operations.
pub struct MenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuRepository<'a> {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a menu item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: &MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let item = sqlx::query_as::<_, MenuItem>(
            r"
            SELECT id, name, description, price, image, special_day
            FROM menu_items
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// List the entire menu, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let items = sqlx::query_as::<_, MenuItem>(
            r"
            SELECT id, name, description, price, image, special_day
            FROM menu_items
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Insert a new menu item and return it with its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, new_item: NewMenuItem) -> Result<MenuItem, RepositoryError> {
        let id = MenuItemId::generate();

        let item = sqlx::query_as::<_, MenuItem>(
            r"
            INSERT INTO menu_items (id, name, description, price, image, special_day)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, image, special_day
            ",
        )
        .bind(&id)
        .bind(&new_item.name)
        .bind(&new_item.description)
        .bind(new_item.price)
        .bind(&new_item.image)
        .bind(&new_item.special_day)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Apply a partial update to a menu item and return the updated item.
    ///
    /// Concurrent updates are last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &MenuItemId,
        changes: MenuItemUpdate,
    ) -> Result<MenuItem, RepositoryError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Err(RepositoryError::NotFound);
        };

        let item = apply_changes(existing, changes);

        let result = sqlx::query(
            r"
            UPDATE menu_items
            SET name = $2, description = $3, price = $4, image = $5, special_day = $6
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.image)
        .bind(&item.special_day)
        .execute(self.pool)
        .await?;

        // The item can disappear between the read and the write
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(item)
    }

    /// Delete a menu item.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: &MenuItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM menu_items
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
