//! Canonical artifact paths.

use library_config::DEFAULT_PROMPTS_DIR;

/// Turns a display name into a filesystem-safe token.
///
/// Lowercases, maps spaces and hyphens to `_`, then drops anything outside
/// `[a-z0-9_]`.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}

/// Derives `prompts/{category}/{id}_{slug}.md`.
///
/// Two names with the same slug in one category produce the same path; the
/// index rejects the second one.
#[must_use]
pub fn derive_path(category: &str, id: &str, name: &str) -> String {
    derive_path_in(DEFAULT_PROMPTS_DIR, category, id, name)
}

/// Like [`derive_path`] with a custom prompts directory.
#[must_use]
pub fn derive_path_in(prompts_dir: &str, category: &str, id: &str, name: &str) -> String {
    format!("{prompts_dir}/{category}/{id}_{}.md", slugify(name))
}
