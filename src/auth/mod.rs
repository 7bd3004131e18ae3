//! Authentication module for the userbase server
//!
//! Password hashing, token issuance/verification, the per-request auth
//! gate, and the login/refresh handlers.

pub mod gate;
pub mod handlers;
pub mod password;
mod service;
mod token;

pub use service::{AuthService, TokenPair};
pub use token::{Claims, TokenService, TokenType};
