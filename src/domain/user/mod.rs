//! User directory types.

mod profile;
mod user_ref;

pub use profile::UserProfile;
pub use user_ref::UserRef;
