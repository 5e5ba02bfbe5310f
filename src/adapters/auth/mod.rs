//! Auth adapters.

mod mock;

pub use mock::MockAuthProvider;
