//! User directory queries.

mod list_profiles;

pub use list_profiles::{ListProfilesHandler, ListProfilesQuery, ProfileListing};
