//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// The signed-in user, if any.
    pub user: Option<CurrentUser>,
}

/// Display the landing page.
///
/// Works for anonymous visitors. The template swaps its navigation and
/// call-to-action depending on whether a user is signed in.
pub async fn home(OptionalUser(user): OptionalUser) -> impl IntoResponse {
    HomeTemplate { user }
}
