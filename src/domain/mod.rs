//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, roles, errors)
//! - `roster` - Participants, status workflow and the keyed roster
//! - `session` - Session records, their storage layout and list views
//! - `user` - User directory entries

pub mod foundation;
pub mod roster;
pub mod session;
pub mod user;
