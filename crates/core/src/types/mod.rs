//! Core types for Minimart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod entities;
pub mod grade;
pub mod id;
pub mod money;
pub mod session;

pub use entities::{Customer, Product};
pub use grade::Grade;
pub use id::*;
pub use money::Money;
pub use session::{SESSION_TTL_HOURS, is_session_expired};
