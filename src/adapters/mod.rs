//! Adapters - Implementations of port interfaces.
//!
//! - `store` - In-memory record store with change feeds
//! - `profile` - In-memory profile directory
//! - `auth` - Mock auth provider

pub mod auth;
pub mod profile;
pub mod store;
