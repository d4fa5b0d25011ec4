//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in user (or an admin) in
//! route handlers. Identity lives in the session; there is no token layer.

use axum::{
    extract::FromRequestParts,
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a signed-in user.
///
/// Browser navigation (GET) is redirected to the login page; other
/// methods get a plain 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
pub enum AuthRejection {
    /// Redirect to login page (for page navigation).
    RedirectToLogin,
    /// Unauthorized response (for form and JSON posts).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Pick the rejection that fits the request: redirects for page loads,
/// 401 for everything else.
fn rejection_for(parts: &Parts) -> AuthRejection {
    if parts.method == Method::GET {
        AuthRejection::RedirectToLogin
    } else {
        AuthRejection::Unauthorized
    }
}

/// Read the current user out of the request's session, if any.
async fn current_user_from(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from(parts)
            .await
            .ok_or_else(|| rejection_for(parts))?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject the request if the user is not logged in.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalUser(user): OptionalUser,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user_from(parts).await))
    }
}

/// Extractor that requires a signed-in admin.
pub struct RequireAdmin(pub CurrentUser);

/// Error returned when admin access is required.
pub enum AdminRejection {
    /// Not logged in at all; redirect page loads to login.
    RedirectToLogin,
    /// Not logged in; plain 401 for form and JSON posts.
    Unauthorized,
    /// Logged in but not an admin.
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, "admin access required").into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from(parts)
            .await
            .ok_or_else(|| match rejection_for(parts) {
                AuthRejection::RedirectToLogin => AdminRejection::RedirectToLogin,
                AuthRejection::Unauthorized => AdminRejection::Unauthorized,
            })?;

        if !user.is_admin {
            return Err(AdminRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
