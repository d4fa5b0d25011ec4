//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - User registration and login (argon2 password hashing)

pub mod auth;

pub use auth::AuthService;
