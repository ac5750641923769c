//! API handlers for the credential lifecycle endpoints.

pub mod auth;
pub mod health;
pub mod root;
