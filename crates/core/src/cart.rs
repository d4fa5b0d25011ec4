//! Shopping cart with price-snapshot lines.
//!
//! The cart lives in the visitor's session, not the database. Each line
//! captures the item's name, image, and unit price at the moment it was
//! added, so later menu edits never change what an open cart will charge.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;
use crate::types::MenuItemId;

/// One cart entry: a menu item reference plus the frozen unit price.
///
/// `quantity` is always at least 1. A line that would drop to zero is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: MenuItemId,
    pub name: String,
    pub image: String,
    /// Unit price frozen at the time the item was first added.
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A visitor's cart, keyed by menu item ID.
///
/// Keys are ordered, so iteration (and therefore rendering and checkout
/// line order) is deterministic regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: BTreeMap<MenuItemId, CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a menu item to the cart.
    ///
    /// A quantity of zero is treated as 1. If the item is already in the
    /// cart the quantities are merged and the existing line keeps its
    /// frozen price and name; otherwise a new line snapshots the item's
    /// current price.
    pub fn add(&mut self, item: &MenuItem, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self.lines.get_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.insert(
                item.id.clone(),
                CartLine {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    image: item.image.clone(),
                    unit_price: item.price,
                    quantity,
                },
            );
        }
    }

    /// Remove an item from the cart. Removing an absent item is a no-op.
    pub fn remove(&mut self, item_id: &MenuItemId) {
        self.lines.remove(item_id);
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Setting the quantity of an
    /// item not in the cart is a no-op.
    pub fn set_quantity(&mut self, item_id: &MenuItemId, quantity: u32) {
        if quantity == 0 {
            self.lines.remove(item_id);
        } else if let Some(line) = self.lines.get_mut(item_id) {
            line.quantity = quantity;
        }
    }

    /// Look up the line for a menu item, if present.
    #[must_use]
    pub fn get(&self, item_id: &MenuItemId) -> Option<&CartLine> {
        self.lines.get(item_id)
    }

    /// Iterate over the lines in item-ID order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Number of distinct items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Cart total: the sum of all line subtotals. Zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.values().map(CartLine::subtotal).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn menu_item(id: &str, name: &str, price_cents: i64) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(price_cents, 2),
            image: format!("/static/images/{id}.jpg"),
            special_day: None,
        }
    }

    #[test]
    fn test_add_snapshots_price() {
        let mut cart = Cart::new();
        let mut item = menu_item("dosa", "Masala Dosa", 850);
        cart.add(&item, 1);

        // A later menu edit must not change the open cart
        item.price = Decimal::new(999, 2);
        let line = cart.get(&item.id).unwrap();
        assert_eq!(line.unit_price, Decimal::new(850, 2));
        assert_eq!(cart.total(), Decimal::new(850, 2));
    }

    #[test]
    fn test_add_existing_merges_quantities_and_keeps_frozen_price() {
        let mut cart = Cart::new();
        let mut item = menu_item("dosa", "Masala Dosa", 850);
        cart.add(&item, 2);

        item.price = Decimal::new(1200, 2);
        item.name = "Dosa Deluxe".to_string();
        cart.add(&item, 3);

        let line = cart.get(&item.id).unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(line.unit_price, Decimal::new(850, 2));
        assert_eq!(line.name, "Masala Dosa");
    }

    #[test]
    fn test_add_zero_quantity_is_one() {
        let mut cart = Cart::new();
        let item = menu_item("idli", "Idli", 500);
        cart.add(&item, 0);
        assert_eq!(cart.get(&item.id).unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        let item = menu_item("idli", "Idli", 500);
        cart.add(&item, 1);

        cart.remove(&item.id);
        assert!(cart.is_empty());

        // Second removal of the same id must not panic or error
        cart.remove(&item.id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let item = menu_item("idli", "Idli", 500);
        cart.add(&item, 3);

        cart.set_quantity(&item.id, 0);
        assert!(cart.get(&item.id).is_none());
    }

    #[test]
    fn test_set_quantity_of_absent_item_is_noop() {
        let mut cart = Cart::new();
        cart.set_quantity(&MenuItemId::new("ghost"), 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_updates_existing_line() {
        let mut cart = Cart::new();
        let item = menu_item("idli", "Idli", 500);
        cart.add(&item, 1);

        cart.set_quantity(&item.id, 4);
        assert_eq!(cart.get(&item.id).unwrap().quantity, 4);
        assert_eq!(cart.total(), Decimal::new(2000, 2));
    }

    #[test]
    fn test_total_sums_line_subtotals() {
        let mut cart = Cart::new();
        cart.add(&menu_item("dosa", "Masala Dosa", 850), 2);
        cart.add(&menu_item("idli", "Idli", 500), 3);

        // 2 * 8.50 + 3 * 5.00 = 32.00
        assert_eq!(cart.total(), Decimal::new(3200, 2));
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new();
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_lines_iterate_in_id_order() {
        let mut cart = Cart::new();
        cart.add(&menu_item("zebra", "Z", 100), 1);
        cart.add(&menu_item("apple", "A", 100), 1);
        cart.add(&menu_item("mango", "M", 100), 1);

        let ids: Vec<&str> = cart.lines().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add(&menu_item("dosa", "Masala Dosa", 850), 2);

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
