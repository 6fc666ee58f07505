//! Request middleware and extractors.

pub mod auth;

pub use auth::{RequireAdmin, bearer_token};
