//! Mentor Roster - roster coordination for bookable mentorship sessions.
//!
//! Admins publish sessions; users request a slot; admins approve, check in
//! and complete participants. Every roster write is an optimistic,
//! revision-checked update, so concurrent operations on one session never
//! lose each other's changes. Observers follow the session list through a
//! live feed of complete, ordered snapshots.
//!
//! # Layout
//!
//! - `domain` - sessions, rosters, participants and the read models over them
//! - `ports` - record store, profile directory and auth provider contracts
//! - `adapters` - in-memory implementations of every port
//! - `application` - command handlers, the change hub and `RosterService`
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
