//! Cart route handlers.
//!
//! The cart lives entirely in the session. Prices are snapshotted when a
//! line is added, so later menu edits do not change what an existing cart
//! charges.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tiffin_core::{Cart, MenuItemId};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::MenuRepository;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub item_id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .map(|line| CartLineView {
                    item_id: line.item_id.to_string(),
                    name: line.name.clone(),
                    image: line.image.clone(),
                    quantity: line.quantity,
                    price: format_price(line.unit_price),
                    line_price: format_price(line.subtotal()),
                })
                .collect(),
            total: format_price(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

/// Format a price as a dollar string.
fn format_price(price: Decimal) -> String {
    format!("${price:.2}")
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: String,
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Parse a quantity field, clamping negatives to zero.
///
/// Returns `None` when the field is not a number at all.
fn parse_quantity(raw: &str) -> Option<u32> {
    let parsed: i64 = raw.trim().parse().ok()?;
    Some(u32::try_from(parsed.max(0)).unwrap_or(u32::MAX))
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub user: Option<CurrentUser>,
    pub cart: CartView,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the cart page.
#[instrument(skip(user, session))]
pub async fn show(OptionalUser(user): OptionalUser, session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartShowTemplate {
        user,
        cart: CartView::from_cart(&cart),
    }
}

/// Add a menu item to the cart.
///
/// Looks the item up so the cart line snapshots its current name and
/// price. A missing quantity, or one that does not parse, counts as 1.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let item_id = MenuItemId::new(form.item_id);
    let quantity = form
        .quantity
        .as_deref()
        .and_then(parse_quantity)
        .unwrap_or(1);

    let Some(item) = MenuRepository::new(state.pool()).find_by_id(&item_id).await? else {
        // The item was deleted between page render and submit.
        tracing::debug!(item_id = %item_id, "Add to cart for unknown item");
        return Ok(Redirect::to("/menu").into_response());
    };

    let mut cart = load_cart(&session).await;
    cart.add(&item, quantity);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
        return Err(AppError::Internal("session write failed".to_string()));
    }

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("item_id", item.id.as_str()), ("name", &item.name)]),
    );

    Ok(Redirect::to("/menu").into_response())
}

/// Change the quantity of a cart line.
///
/// A quantity of zero removes the line. A quantity that does not parse
/// leaves the cart untouched.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    if let Some(quantity) = parse_quantity(&form.quantity) {
        let item_id = MenuItemId::new(form.item_id);
        let mut cart = load_cart(&session).await;
        cart.set_quantity(&item_id, quantity);

        if let Err(e) = save_cart(&session, &cart).await {
            tracing::error!("Failed to save cart to session: {e}");
        }
    }

    Redirect::to("/cart").into_response()
}

/// Remove a line from the cart.
///
/// Removing an item that is not in the cart is a no-op.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let item_id = MenuItemId::new(form.item_id);
    let mut cart = load_cart(&session).await;
    cart.remove(&item_id);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    Redirect::to("/cart").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_plain_number() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity(" 7 "), Some(7));
    }

    #[test]
    fn test_parse_quantity_clamps_negative_to_zero() {
        assert_eq!(parse_quantity("-3"), Some(0));
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert_eq!(parse_quantity("lots"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("2.5"), None);
    }

    #[test]
    fn test_cart_view_formats_totals() {
        use rust_decimal::Decimal;
        use tiffin_core::MenuItem;

        let item = MenuItem {
            id: MenuItemId::new("dosa"),
            name: "Masala Dosa".to_string(),
            description: String::new(),
            price: Decimal::new(850, 2),
            image: String::new(),
            special_day: None,
        };

        let mut cart = Cart::default();
        cart.add(&item, 2);

        let view = CartView::from_cart(&cart);
        assert_eq!(view.lines.len(), 1);
        let line = view.lines.first().unwrap();
        assert_eq!(line.price, "$8.50");
        assert_eq!(line.line_price, "$17.00");
        assert_eq!(view.total, "$17.00");
        assert_eq!(view.item_count, 2);
    }
}
