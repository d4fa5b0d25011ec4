//! Integration tests for Tiffin.
//!
//! # Running Tests
//!
//! The order-flow tests exercise the library crates directly and need no
//! running services:
//!
//! ```bash
//! cargo test -p tiffin-integration-tests
//! ```
//!
//! The HTTP tests drive a running site over reqwest and are ignored by
//! default:
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p tiffin-cli -- migrate
//!
//! # Start the site, then run the ignored tests against it
//! cargo run -p tiffin-site &
//! cargo test -p tiffin-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `order_flow` - Cart and checkout behavior across the core crate
//! - `site_http` - HTTP round trips against a running site
//!
//! `SITE_BASE_URL` points the HTTP tests at a non-default server
//! (defaults to `http://localhost:4000`).
