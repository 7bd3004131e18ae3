//! Database module for userbase server
//!
//! User row model and the `UserStore` persistence contract with its
//! Postgres implementation.

pub mod models;
pub mod store;

pub use models::{NewUser, User, UserChanges};
pub use store::{PgUserStore, UserStore};
