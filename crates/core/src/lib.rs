//! Tiffin Core - Shared domain library.
//!
//! This crate provides the domain model used across all Tiffin components:
//! - `site` - Public-facing ordering site
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`menu`] - Menu item model
//! - [`cart`] - Shopping cart with price-snapshot lines
//! - [`checkout`] - Checkout preview and order finalization
//! - [`order`] - Finalized order model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod menu;
pub mod order;
pub mod types;

pub use cart::{Cart, CartLine};
pub use checkout::{CheckoutDetails, CheckoutError, CheckoutLine, CheckoutSummary};
pub use menu::MenuItem;
pub use order::{CustomerInfo, Order, OrderStatus};
pub use types::*;
