//! Menu route handler.
//!
//! Renders the full menu and highlights items whose special day matches
//! the current weekday in the configured timezone.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use tiffin_core::MenuItem;
use tracing::instrument;

use crate::db::MenuRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Menu item display data for templates.
pub struct MenuItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub is_special_today: bool,
}

impl MenuItemView {
    fn from_item(item: MenuItem, today: &str) -> Self {
        let is_special_today = item.is_special_on(today);
        Self {
            id: item.id.into_inner(),
            name: item.name,
            description: item.description,
            price: format_price(item.price),
            image: item.image,
            is_special_today,
        }
    }
}

/// Format a price as a dollar string.
fn format_price(price: Decimal) -> String {
    format!("${price:.2}")
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub user: Option<CurrentUser>,
    pub items: Vec<MenuItemView>,
    pub today: String,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the menu with today's specials highlighted.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Response, AppError> {
    // Weekday in the configured local timezone, not UTC.
    let today = chrono::Utc::now()
        .with_timezone(&state.config().specials_offset)
        .format("%A")
        .to_string();

    let items = MenuRepository::new(state.pool()).list_all().await?;
    let items = items
        .into_iter()
        .map(|item| MenuItemView::from_item(item, &today))
        .collect();

    Ok(MenuTemplate {
        user: Some(user),
        items,
        today,
    }
    .into_response())
}
