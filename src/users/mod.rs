//! User management module
//!
//! CRUD service over the user store plus the `/users` and `/me` handlers.

pub mod handlers;
pub mod me;
mod service;

pub use service::UserService;
