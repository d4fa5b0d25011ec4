//! Authentication route handlers.
//!
//! Registration and login are backed by the local `users` table with
//! argon2 password hashes. A successful login stores a [`CurrentUser`]
//! in the session; logout destroys the whole session, cart included.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::services::auth::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

// =============================================================================
// Message Mapping
// =============================================================================

/// Map a login error code from the query string to a display message.
fn login_error_message(code: &str) -> String {
    match code {
        "invalid_credentials" => "Invalid email or password.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Map a login success code from the query string to a display message.
fn login_success_message(code: &str) -> String {
    match code {
        "registered" => "Account created. You can sign in now.".to_string(),
        _ => "Done.".to_string(),
    }
}

/// Map a registration error code from the query string to a display message.
fn register_error_message(code: &str) -> String {
    match code {
        "missing_fields" => "Name, email and password are all required.".to_string(),
        "email_taken" => "An account with this email already exists.".to_string(),
        "weak_password" => "Password must be at least 8 characters long.".to_string(),
        "invalid_email" => "That email address does not look valid.".to_string(),
        _ => "Registration failed. Please try again.".to_string(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        user,
        error: query.error.as_deref().map(login_error_message),
        success: query.success.as_deref().map(login_success_message),
    }
}

/// Handle login form submission.
///
/// Verifies the password against the stored argon2 hash and stores the
/// user in the session on success.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login(form.email.trim(), &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id.clone(),
                name: user.name,
                is_admin: user.is_admin,
            };

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/login?error=session").into_response();
            }

            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, "User logged in");
            Redirect::to("/menu").into_response()
        }
        // An unparseable email reads the same as a wrong password.
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            tracing::info!("Login rejected");
            Redirect::to("/login?error=invalid_credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            Redirect::to("/login?error=failed").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        user,
        error: query.error.as_deref().map(register_error_message),
    }
}

/// Handle registration form submission.
///
/// Creates a user with a hashed password. The new user is not logged in
/// automatically; they are sent to the login page with a success banner.
#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let name = form.name.trim();
    let email = form.email.trim();

    if name.is_empty() || email.is_empty() || form.password.is_empty() {
        return Redirect::to("/register?error=missing_fields").into_response();
    }

    let auth = AuthService::new(state.pool());

    match auth.register(name, email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            Redirect::to("/login?success=registered").into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to("/register?error=email_taken").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/register?error=weak_password").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/register?error=invalid_email").into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            Redirect::to("/register?error=failed").into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the entire session, which also discards the cart.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session user: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();
    Redirect::to("/").into_response()
}
