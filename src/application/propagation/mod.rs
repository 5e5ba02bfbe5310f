//! Live propagation of session changes to local observers.

mod hub;
mod subscription;

pub use hub::ChangeHub;
pub use subscription::{FeedListener, SessionSubscription};
