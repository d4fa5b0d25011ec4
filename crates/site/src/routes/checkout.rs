//! Checkout route handlers.
//!
//! Checkout freezes the session cart into an immutable order row. The
//! summary page and the confirmation page both render from the same
//! snapshot shape, so a placed order always shows exactly what was
//! charged.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tiffin_core::{
    Cart, CheckoutDetails, CheckoutError, CheckoutLine, CustomerInfo, OrderId, checkout,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{CurrentUser, session_keys};
use crate::routes::cart::load_cart;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Order line display data for templates.
#[derive(Clone)]
pub struct CheckoutLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub subtotal: String,
}

impl CheckoutLineView {
    fn from_line(line: &CheckoutLine) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            price: format_price(line.unit_price),
            subtotal: format_price(line.subtotal),
        }
    }
}

/// Format a price as a dollar string.
fn format_price(price: Decimal) -> String {
    format!("${price:.2}")
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub error: Option<String>,
}

/// Map a checkout error code from the query string to a display message.
fn checkout_error_message(code: &str) -> String {
    match code {
        "missing_fields" => "Please fill in your name, address and phone number.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub user: Option<CurrentUser>,
    pub lines: Vec<CheckoutLineView>,
    pub total: String,
    pub is_empty: bool,
    pub error: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub user: Option<CurrentUser>,
    pub order_id: String,
    pub lines: Vec<CheckoutLineView>,
    pub total: String,
    pub customer: CustomerInfo,
    pub payment_method: String,
    pub status: String,
    pub placed_at: String,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the checkout page with an order summary and customer form.
///
/// Renders for an empty cart too; the template shows a notice and hides
/// the form.
#[instrument(skip(user, session))]
pub async fn show(
    OptionalUser(user): OptionalUser,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    let summary = checkout::preview(&cart);

    CheckoutTemplate {
        user,
        lines: summary
            .lines
            .iter()
            .map(CheckoutLineView::from_line)
            .collect(),
        total: format_price(summary.total),
        is_empty: cart.is_empty(),
        error: query.error.as_deref().map(checkout_error_message),
    }
}

/// Handle checkout form submission.
///
/// Places the order and clears the cart. The cart is only cleared after
/// the order row is written, so a failed write never loses the cart.
#[instrument(skip(state, session, user, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let name = form.name.trim();
    let address = form.address.trim();
    let phone = form.phone.trim();
    let payment_method = form.payment_method.trim();

    if name.is_empty() || address.is_empty() || phone.is_empty() || payment_method.is_empty() {
        return Redirect::to("/checkout?error=missing_fields").into_response();
    }

    let cart = load_cart(&session).await;
    let details = CheckoutDetails {
        customer: CustomerInfo {
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
        },
        payment_method: payment_method.to_string(),
        user_id: user.as_ref().map(|u| u.id.clone()),
        user_name: user.map(|u| u.name),
    };

    let order = match checkout::finalize(&cart, details, chrono::Utc::now()) {
        Ok(order) => order,
        Err(CheckoutError::EmptyCart) => {
            tracing::debug!("Checkout submitted with an empty cart");
            return Redirect::to("/cart").into_response();
        }
    };

    // A failed insert sends the visitor back to their intact cart; the
    // cart is the source of truth until an order id exists.
    let order_id = match OrderRepository::new(state.pool()).insert(&order).await {
        Ok(order_id) => order_id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to store order");
            return Redirect::to("/cart").into_response();
        }
    };

    if let Err(e) = session.remove::<Cart>(session_keys::CART).await {
        tracing::error!("Failed to clear cart from session: {e}");
    }

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order_id.as_str())]),
    );
    tracing::info!(order_id = %order_id, total = %order.total, "Order placed");

    Redirect::to(&format!("/orders/{order_id}")).into_response()
}

/// Display the confirmation page for a placed order.
///
/// Order IDs are unguessable, so the page is reachable by anyone holding
/// the link, logged in or not.
#[instrument(skip(state, user))]
pub async fn confirmation(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let order_id = OrderId::new(id);
    let placed = OrderRepository::new(state.pool())
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    let order = placed.order;
    Ok(ConfirmationTemplate {
        user,
        order_id: placed.id.into_inner(),
        lines: order
            .lines
            .iter()
            .map(CheckoutLineView::from_line)
            .collect(),
        total: format_price(order.total),
        customer: order.customer,
        payment_method: order.payment_method,
        status: order.status.to_string(),
        placed_at: order.created_at.format("%B %e, %Y at %H:%M UTC").to_string(),
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_line_view_formats_prices() {
        let line = CheckoutLine {
            item_id: tiffin_core::MenuItemId::new("idli"),
            name: "Idli".to_string(),
            unit_price: Decimal::new(450, 2),
            quantity: 3,
            subtotal: Decimal::new(1350, 2),
        };

        let view = CheckoutLineView::from_line(&line);
        assert_eq!(view.price, "$4.50");
        assert_eq!(view.subtotal, "$13.50");
        assert_eq!(view.quantity, 3);
    }

    #[test]
    fn test_checkout_error_message_known_code() {
        assert!(checkout_error_message("missing_fields").contains("name"));
    }
}
