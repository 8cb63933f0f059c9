//! URL slug derivation for asset titles.
//!
//! Slugs are lowercase ASCII alphanumerics separated by single hyphens.
//! Collisions are resolved by appending `-1`, `-2`, ... to the base slug;
//! the persistence layer's unique constraint is the final arbiter.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of the base slug (before any collision suffix).
pub const MAX_SLUG_LENGTH: usize = 80;

/// Base slug used when a title has no usable characters.
pub const FALLBACK_SLUG: &str = "asset";

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Derive the base slug for a title.
///
/// # Examples
///
/// ```
/// use marketplace_core::slug::slugify;
///
/// assert_eq!(slugify("My SaaS"), "my-saas");
/// assert_eq!(slugify("  Hello, World!  "), "hello-world");
/// assert_eq!(slugify("???"), "asset");
/// ```
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let replaced = NON_ALNUM_RE.replace_all(&lower, "-");
    let trimmed = replaced.trim_matches('-');

    let mut slug: String = trimmed.chars().take(MAX_SLUG_LENGTH).collect();
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// The `attempt`-th candidate for `base`: the base itself for attempt 0,
/// then `base-1`, `base-2`, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}
