//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::RequireUser;
use crate::models::CurrentUser;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub user: Option<CurrentUser>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub user: Option<CurrentUser>,
}

/// Display the about page.
pub async fn about(RequireUser(user): RequireUser) -> impl IntoResponse {
    AboutTemplate { user: Some(user) }
}

/// Display the contact page.
pub async fn contact(RequireUser(user): RequireUser) -> impl IntoResponse {
    ContactTemplate { user: Some(user) }
}
