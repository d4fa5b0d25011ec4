//! HTTP route handlers for the ordering site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Registration page
//! POST /register               - Registration action
//! POST /logout                 - Logout action
//!
//! # Pages (require login)
//! GET  /menu                   - Daily menu with weekday specials
//! GET  /about                  - About page
//! GET  /contact                - Contact page
//!
//! # Cart (session-backed)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add an item to the cart
//! POST /cart/update            - Change a line quantity
//! POST /cart/remove            - Remove a line
//!
//! # Checkout
//! GET  /checkout               - Order summary and customer details form
//! POST /checkout               - Place the order
//! GET  /orders/{id}            - Order confirmation
//!
//! # Admin (requires admin account)
//! GET  /admin                  - Dashboard with the add-item form
//! GET  /admin/items            - Menu item management table
//! GET  /admin/items/{id}/edit  - Edit form for one item
//! GET  /admin/menu             - Full menu as JSON
//! POST /admin/items/add        - Create a menu item
//! POST /admin/items/update     - Update a menu item
//! POST /admin/items/delete     - Delete a menu item
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod menu;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the logged-in page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(menu::show))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/orders/{id}", get(checkout::confirmation))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/items", get(admin::items))
        .route("/items/{id}/edit", get(admin::edit_item))
        .route("/menu", get(admin::menu_json))
        .route("/items/add", post(admin::add_item))
        .route("/items/update", post(admin::update_item))
        .route("/items/delete", post(admin::delete_item))
}

/// Create all routes for the ordering site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home::home))
        // Auth routes
        .merge(auth_routes())
        // Logged-in pages
        .merge(page_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout and order confirmation
        .merge(checkout_routes())
        // Admin routes
        .nest("/admin", admin_routes())
}
