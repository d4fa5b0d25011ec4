//! Admin route handlers.
//!
//! Every handler requires an admin account via [`RequireAdmin`]. The
//! mutating endpoints accept either JSON or form submissions through
//! [`JsonOrForm`]: browser forms get redirects back to the admin pages,
//! JSON clients get JSON bodies and status codes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tiffin_core::{MenuItem, MenuItemId};
use tracing::instrument;

use crate::db::menu::{MenuItemUpdate, NewMenuItem};
use crate::db::{MenuRepository, RepositoryError};
use crate::error::AppError;
use crate::extract::JsonOrForm;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Menu item row for the admin management table.
pub struct AdminItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub special_day: String,
}

impl AdminItemView {
    fn from_item(item: MenuItem) -> Self {
        Self {
            id: item.id.into_inner(),
            name: item.name,
            description: item.description,
            price: format!("${:.2}", item.price),
            special_day: item.special_day.unwrap_or_default(),
        }
    }
}

/// Menu item data for pre-filling the edit form.
///
/// Prices are rendered bare ("8.50", no currency sign) so they round-trip
/// through an `<input>` unchanged.
pub struct EditItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub special_day: String,
}

impl EditItemView {
    fn from_item(item: MenuItem) -> Self {
        Self {
            id: item.id.into_inner(),
            name: item.name,
            description: item.description,
            price: item.price.to_string(),
            image: item.image,
            special_day: item.special_day.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Payload Types
// =============================================================================

/// Payload for creating a menu item.
#[derive(Debug, Deserialize)]
pub struct CreateMenuItemPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image: Option<String>,
    pub special_day: Option<String>,
}

/// Payload for updating a menu item. Absent fields keep their value.
#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemPayload {
    pub item_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub special_day: Option<String>,
}

/// Payload for deleting a menu item.
#[derive(Debug, Deserialize)]
pub struct DeleteMenuItemPayload {
    pub item_id: String,
}

/// Query parameters for error display on the admin pages.
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub error: Option<String>,
}

/// Map an admin error code from the query string to a display message.
fn admin_error_message(code: &str) -> String {
    match code {
        "invalid_price" => "Price must be a number like 8.50.".to_string(),
        "missing_name" => "Give the item a name.".to_string(),
        "not_found" => "That menu item no longer exists.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Build a rejection response in whichever shape the client asked for.
fn reject(wants_json: bool, status: StatusCode, message: &str, redirect_to: &str) -> Response {
    if wants_json {
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    } else {
        Redirect::to(redirect_to).into_response()
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template with the add-item form.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Admin item management table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/items.html")]
pub struct AdminItemsTemplate {
    pub user: Option<CurrentUser>,
    pub items: Vec<AdminItemView>,
    pub error: Option<String>,
}

/// Admin edit-item form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/edit_item.html")]
pub struct AdminEditItemTemplate {
    pub user: Option<CurrentUser>,
    pub item: EditItemView,
}

// =============================================================================
// Page Routes
// =============================================================================

/// Display the admin dashboard.
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<AdminQuery>,
) -> impl IntoResponse {
    AdminIndexTemplate {
        user: Some(admin),
        error: query.error.as_deref().map(admin_error_message),
    }
}

/// Display the menu item management table.
#[instrument(skip(state, admin))]
pub async fn items(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<AdminQuery>,
) -> Result<Response, AppError> {
    let items = MenuRepository::new(state.pool()).list_all().await?;

    Ok(AdminItemsTemplate {
        user: Some(admin),
        items: items.into_iter().map(AdminItemView::from_item).collect(),
        error: query.error.as_deref().map(admin_error_message),
    }
    .into_response())
}

/// Display the edit form for one menu item.
#[instrument(skip(state, admin))]
pub async fn edit_item(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let item_id = MenuItemId::new(id);
    let item = MenuRepository::new(state.pool())
        .find_by_id(&item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("menu item not found".to_string()))?;

    Ok(AdminEditItemTemplate {
        user: Some(admin),
        item: EditItemView::from_item(item),
    }
    .into_response())
}

/// Return the full menu as JSON.
#[instrument(skip(state, _admin))]
pub async fn menu_json(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Response, AppError> {
    let items = MenuRepository::new(state.pool()).list_all().await?;

    Ok(Json(serde_json::json!({
        "message": "menu retrieved",
        "menu": items,
    }))
    .into_response())
}

// =============================================================================
// Mutation Routes
// =============================================================================

/// Create a menu item.
#[instrument(skip(state, admin, body))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    body: JsonOrForm<CreateMenuItemPayload>,
) -> Result<Response, AppError> {
    let wants_json = body.is_json();
    let payload = body.into_inner();

    let name = payload.name.trim();
    if name.is_empty() {
        return Ok(reject(
            wants_json,
            StatusCode::BAD_REQUEST,
            "name is required",
            "/admin?error=missing_name",
        ));
    }

    let Ok(price) = payload.price.trim().parse::<Decimal>() else {
        return Ok(reject(
            wants_json,
            StatusCode::BAD_REQUEST,
            "invalid price",
            "/admin?error=invalid_price",
        ));
    };

    let new_item = NewMenuItem {
        name: name.to_string(),
        description: payload.description.unwrap_or_default(),
        price,
        image: payload.image.unwrap_or_default(),
        special_day: payload
            .special_day
            .map(|day| day.trim().to_string())
            .filter(|day| !day.is_empty()),
    };

    let item = MenuRepository::new(state.pool()).insert(new_item).await?;
    tracing::info!(item_id = %item.id, admin = %admin.id, "Menu item created");

    if wants_json {
        Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "message": "menu item created", "item": item })),
        )
            .into_response())
    } else {
        Ok(Redirect::to("/admin/items").into_response())
    }
}

/// Update a menu item.
///
/// An empty `special_day` clears the special. An empty price keeps the
/// old one, since the edit form always submits the field.
#[instrument(skip(state, admin, body))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    body: JsonOrForm<UpdateMenuItemPayload>,
) -> Result<Response, AppError> {
    let wants_json = body.is_json();
    let payload = body.into_inner();
    let item_id = MenuItemId::new(payload.item_id);

    let price = match payload.price.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<Decimal>() {
            Ok(price) => Some(price),
            Err(_) => {
                return Ok(reject(
                    wants_json,
                    StatusCode::BAD_REQUEST,
                    "invalid price",
                    "/admin/items?error=invalid_price",
                ));
            }
        },
    };

    let changes = MenuItemUpdate {
        name: payload.name.filter(|name| !name.trim().is_empty()),
        description: payload.description,
        price,
        image: payload.image,
        special_day: payload.special_day.map(|day| day.trim().to_string()),
    };

    match MenuRepository::new(state.pool())
        .update(&item_id, changes)
        .await
    {
        Ok(item) => {
            tracing::info!(item_id = %item.id, admin = %admin.id, "Menu item updated");
            if wants_json {
                Ok(
                    Json(serde_json::json!({ "message": "menu item updated", "item": item }))
                        .into_response(),
                )
            } else {
                Ok(Redirect::to("/admin/items").into_response())
            }
        }
        Err(RepositoryError::NotFound) => Ok(reject(
            wants_json,
            StatusCode::NOT_FOUND,
            "menu item not found",
            "/admin/items?error=not_found",
        )),
        Err(e) => Err(e.into()),
    }
}

/// Delete a menu item.
#[instrument(skip(state, admin, body))]
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    body: JsonOrForm<DeleteMenuItemPayload>,
) -> Result<Response, AppError> {
    let wants_json = body.is_json();
    let payload = body.into_inner();
    let item_id = MenuItemId::new(payload.item_id);

    let deleted = MenuRepository::new(state.pool()).delete(&item_id).await?;
    if !deleted {
        return Ok(reject(
            wants_json,
            StatusCode::NOT_FOUND,
            "menu item not found",
            "/admin/items?error=not_found",
        ));
    }

    tracing::info!(item_id = %item_id, admin = %admin.id, "Menu item deleted");

    if wants_json {
        Ok(Json(serde_json::json!({ "message": "menu item deleted" })).into_response())
    } else {
        Ok(Redirect::to("/admin/items").into_response())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_item() -> MenuItem {
        MenuItem {
            id: MenuItemId::new("thali"),
            name: "Thali".to_string(),
            description: "A bit of everything".to_string(),
            price: Decimal::new(1250, 2),
            image: "/static/images/thali.jpg".to_string(),
            special_day: Some("Friday".to_string()),
        }
    }

    #[test]
    fn test_admin_item_view_formats_price_with_sign() {
        let view = AdminItemView::from_item(sample_item());
        assert_eq!(view.price, "$12.50");
        assert_eq!(view.special_day, "Friday");
    }

    #[test]
    fn test_edit_item_view_keeps_price_bare() {
        let view = EditItemView::from_item(sample_item());
        assert_eq!(view.price, "12.50");
    }

    #[test]
    fn test_admin_error_message_unknown_code_is_generic() {
        assert_eq!(
            admin_error_message("mystery"),
            "Something went wrong. Please try again."
        );
    }
}
