//! Checkout preview and order finalization.
//!
//! Checkout is a pure function of the cart: `preview` computes what the
//! confirmation page shows, and `finalize` turns the same numbers into an
//! [`Order`]. Both read the cart's frozen prices only; the menu is never
//! consulted again.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::order::{CustomerInfo, Order, OrderStatus};
use crate::types::{MenuItemId, UserId};

/// Errors that can occur while finalizing a checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines, so there is nothing to order.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,
}

/// One line of a checkout, with the subtotal already computed.
///
/// This is also the shape persisted inside an order, so old orders keep
/// rendering even after menu items are edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub item_id: MenuItemId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// Everything the checkout page needs to render: lines plus the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    pub lines: Vec<CheckoutLine>,
    pub total: Decimal,
}

/// Details collected from the checkout form, plus the identity of the
/// signed-in user when there is one.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub customer: CustomerInfo,
    pub payment_method: String,
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
}

/// Compute the checkout view of a cart.
///
/// Works for an empty cart too: no lines, zero total.
#[must_use]
pub fn preview(cart: &Cart) -> CheckoutSummary {
    let lines: Vec<CheckoutLine> = cart
        .lines()
        .map(|line| CheckoutLine {
            item_id: line.item_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            subtotal: line.subtotal(),
        })
        .collect();
    let total = lines.iter().map(|line| line.subtotal).sum();

    CheckoutSummary { lines, total }
}

/// Turn a non-empty cart into an order.
///
/// The resulting order's lines and total are exactly what [`preview`]
/// would have shown for the same cart. The caller supplies the timestamp
/// so persistence and tests stay deterministic.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
pub fn finalize(
    cart: &Cart,
    details: CheckoutDetails,
    created_at: DateTime<Utc>,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let CheckoutSummary { lines, total } = preview(cart);

    Ok(Order {
        lines,
        total,
        customer: details.customer,
        payment_method: details.payment_method,
        status: OrderStatus::Pending,
        user_id: details.user_id,
        user_name: details.user_name,
        created_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::menu::MenuItem;

    fn menu_item(id: &str, price_cents: i64) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: format!("Item {id}"),
            description: String::new(),
            price: Decimal::new(price_cents, 2),
            image: String::new(),
            special_day: None,
        }
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            customer: CustomerInfo {
                name: "Asha".to_string(),
                address: "12 Harbour Road".to_string(),
                phone: "040 1234567".to_string(),
            },
            payment_method: "cash".to_string(),
            user_id: None,
            user_name: None,
        }
    }

    #[test]
    fn test_preview_of_empty_cart() {
        let summary = preview(&Cart::new());
        assert!(summary.lines.is_empty());
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_preview_computes_subtotals_and_total() {
        let mut cart = Cart::new();
        cart.add(&menu_item("dosa", 850), 2);
        cart.add(&menu_item("idli", 500), 1);

        let summary = preview(&cart);
        assert_eq!(summary.lines.len(), 2);

        let dosa = summary
            .lines
            .iter()
            .find(|l| l.item_id.as_str() == "dosa")
            .unwrap();
        assert_eq!(dosa.subtotal, Decimal::new(1700, 2));
        assert_eq!(summary.total, Decimal::new(2200, 2));
    }

    #[test]
    fn test_finalize_empty_cart_fails() {
        let err = finalize(&Cart::new(), details(), Utc::now()).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_finalize_matches_preview() {
        let mut cart = Cart::new();
        cart.add(&menu_item("dosa", 850), 3);

        let summary = preview(&cart);
        let order = finalize(&cart, details(), Utc::now()).unwrap();

        assert_eq!(order.lines, summary.lines);
        assert_eq!(order.total, summary.total);
    }

    #[test]
    fn test_finalize_sets_pending_status_and_copies_details() {
        let mut cart = Cart::new();
        cart.add(&menu_item("idli", 500), 1);

        let created_at = Utc::now();
        let mut d = details();
        d.user_id = Some(UserId::new("user1"));
        d.user_name = Some("Asha".to_string());

        let order = finalize(&cart, d, created_at).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer.name, "Asha");
        assert_eq!(order.payment_method, "cash");
        assert_eq!(order.user_id, Some(UserId::new("user1")));
        assert_eq!(order.user_name.as_deref(), Some("Asha"));
        assert_eq!(order.created_at, created_at);
    }

    #[test]
    fn test_finalize_does_not_consume_the_cart() {
        let mut cart = Cart::new();
        cart.add(&menu_item("dosa", 850), 1);

        let _ = finalize(&cart, details(), Utc::now()).unwrap();
        // The caller clears the cart only after the order is stored
        assert!(!cart.is_empty());
    }
}
