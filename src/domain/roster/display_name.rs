//! Display-name resolution for roster entries.
//!
//! Resolution walks an ordered list of resolvers and takes the first
//! non-empty answer. When every resolver declines, [`FALLBACK_NAME`] is used.

use crate::domain::user::UserProfile;

/// Label used when no source yields a name.
pub const FALLBACK_NAME: &str = "Participant";

/// Everything a resolver may look at.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSources<'a> {
    pub profile: Option<&'a UserProfile>,
    pub display_name: Option<&'a str>,
    pub email: Option<&'a str>,
}

/// A single step of the resolution chain.
pub type NameResolver = fn(&NameSources<'_>) -> Option<String>;

/// Resolution order: profile name, profile team name, auth display name,
/// email local part.
pub const RESOLVERS: &[NameResolver] = &[
    from_profile_name,
    from_profile_team_name,
    from_display_name,
    from_email_local_part,
];

/// Resolves a display name using [`RESOLVERS`].
pub fn resolve_display_name(sources: &NameSources<'_>) -> String {
    resolve_with(RESOLVERS, sources)
}

/// Resolves a display name using a caller-supplied resolver chain.
pub fn resolve_with(resolvers: &[NameResolver], sources: &NameSources<'_>) -> String {
    resolvers
        .iter()
        .find_map(|resolve| resolve(sources))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn from_profile_name(sources: &NameSources<'_>) -> Option<String> {
    non_blank(sources.profile.and_then(|p| p.name.as_deref()))
}

fn from_profile_team_name(sources: &NameSources<'_>) -> Option<String> {
    non_blank(sources.profile.and_then(|p| p.team_name.as_deref()))
}

fn from_display_name(sources: &NameSources<'_>) -> Option<String> {
    non_blank(sources.display_name)
}

fn from_email_local_part(sources: &NameSources<'_>) -> Option<String> {
    let email = sources.email?;
    let local = email.split('@').next().unwrap_or_default();
    let words: Vec<String> = local
        .split(['.', '_', '-', '+'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
