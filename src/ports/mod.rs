//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RecordStore` - Document store with partial updates and a change feed
//! - `ProfileDirectory` - User profiles (names, team names, emails)
//! - `AuthProvider` - The signed-in caller and their role

mod auth_provider;
mod profile_directory;
mod record_store;

pub use auth_provider::AuthProvider;
pub use profile_directory::ProfileDirectory;
pub use record_store::{ChangeFeed, Fields, Record, RecordStore};
