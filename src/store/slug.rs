//! Slug derivation for source directory names.

use regex::Regex;
use std::sync::LazyLock;

/// Longest slug produced, in bytes.
pub const MAX_SLUG_LEN: usize = 120;

/// Slug used when a title has no usable characters.
pub const FALLBACK_SLUG: &str = "untitled";

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));

/// Lowercase, hyphen-separated, filesystem-safe form of `text`.
///
/// Runs of anything other than ASCII letters and digits collapse to a single
/// hyphen; leading and trailing hyphens are dropped.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lower, "-");
    let mut slug = slug.trim_matches('-').to_string();

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Andrej Karpathy: Software Is Changing (Again)"),
            "andrej-karpathy-software-is-changing-again"
        );
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("example.com"), "example-com");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify("???"), "untitled");
    }

    #[test]
    fn test_slugify_is_deterministic_and_collides() {
        assert_eq!(slugify("Rust Tips"), slugify("Rust Tips"));
        assert_eq!(slugify("Rust: Tips"), slugify("rust tips!"));
    }

    #[test]
    fn test_slugify_truncates() {
        let long = "word ".repeat(60);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }
}
