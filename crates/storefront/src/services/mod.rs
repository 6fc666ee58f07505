//! Business services composing repositories and core rules.

pub mod auth;
pub mod ledger;

pub use auth::{AuthError, AuthService};
pub use ledger::{LedgerError, LedgerService};
