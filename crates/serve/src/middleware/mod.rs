//! Middleware module for Shelf serve crate

pub mod auth;

pub use auth::{require_bearer_token, require_dev_mode, AuthPolicy};
