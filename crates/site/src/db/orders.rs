//! Order repository for database operations.
//!
//! Orders are written once at checkout and read back for the confirmation
//! page. Line items are stored as JSONB so an order stays renderable after
//! the menu items it referenced are edited or deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use tiffin_core::checkout::CheckoutLine;
use tiffin_core::order::{CustomerInfo, Order, OrderStatus};
use tiffin_core::{OrderId, UserId};

use super::RepositoryError;

/// Raw `orders` row with customer fields flattened and lines as JSONB.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    lines: serde_json::Value,
    total: Decimal,
    customer_name: String,
    customer_address: String,
    customer_phone: String,
    payment_method: String,
    status: OrderStatus,
    user_id: Option<UserId>,
    user_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_placed(self) -> Result<PlacedOrder, RepositoryError> {
        let lines: Vec<CheckoutLine> = serde_json::from_value(self.lines).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order lines in database: {e}"))
        })?;

        Ok(PlacedOrder {
            id: self.id,
            order: Order {
                lines,
                total: self.total,
                customer: CustomerInfo {
                    name: self.customer_name,
                    address: self.customer_address,
                    phone: self.customer_phone,
                },
                payment_method: self.payment_method,
                status: self.status,
                user_id: self.user_id,
                user_name: self.user_name,
                created_at: self.created_at,
            },
        })
    }
}

/// An order as stored, with its assigned ID.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub order: Order,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a finalized order and return its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the order lines cannot
    /// be serialized. Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, order: &Order) -> Result<OrderId, RepositoryError> {
        let id = OrderId::generate();

        let lines = serde_json::to_value(&order.lines).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize order lines: {e}"))
        })?;

        sqlx::query(
            r"
            INSERT INTO orders (
                id, lines, total,
                customer_name, customer_address, customer_phone,
                payment_method, status, user_id, user_name, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(&id)
        .bind(&lines)
        .bind(order.total)
        .bind(&order.customer.name)
        .bind(&order.customer.address)
        .bind(&order.customer.phone)
        .bind(&order.payment_method)
        .bind(order.status)
        .bind(&order.user_id)
        .bind(&order.user_name)
        .bind(order.created_at)
        .execute(self.pool)
        .await?;

        Ok(id)
    }

    /// Get a stored order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored lines are invalid.
    pub async fn find_by_id(&self, id: &OrderId) -> Result<Option<PlacedOrder>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, lines, total,
                   customer_name, customer_address, customer_phone,
                   payment_method, status, user_id, user_name, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_placed).transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tiffin_core::MenuItemId;

    fn row(lines: serde_json::Value) -> OrderRow {
        OrderRow {
            id: OrderId::new("order1"),
            lines,
            total: Decimal::new(1700, 2),
            customer_name: "Asha".to_string(),
            customer_address: "12 Harbour Road".to_string(),
            customer_phone: "040 1234567".to_string(),
            payment_method: "cash".to_string(),
            status: OrderStatus::Pending,
            user_id: None,
            user_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_row_rejects_corrupt_lines() {
        let row = row(json!({"not": "a list"}));
        assert!(matches!(
            row.into_placed(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_order_row_round_trips_valid_lines() {
        let lines = vec![CheckoutLine {
            item_id: MenuItemId::new("dosa"),
            name: "Masala Dosa".to_string(),
            unit_price: Decimal::new(850, 2),
            quantity: 2,
            subtotal: Decimal::new(1700, 2),
        }];
        let row = row(serde_json::to_value(&lines).unwrap());

        let placed = row.into_placed().unwrap();
        assert_eq!(placed.order.lines, lines);
        assert_eq!(placed.order.customer.name, "Asha");
    }
}
