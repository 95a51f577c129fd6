use regex_lite::Regex;
use std::sync::LazyLock;

const MAX_SLUG_LEN: usize = 100;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("slug pattern is valid"));

/// Lower-cases `text` and collapses every run of non-alphanumeric
/// characters into a single hyphen.
pub fn create_slug(text: &str) -> String {
    let lower = text.to_lowercase();
    let slug = NON_ALPHANUMERIC.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    // Only ASCII survives the replacement, so byte slicing is safe.
    let slug = &slug[..slug.len().min(MAX_SLUG_LEN)];
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(create_slug("How to remote work"), "how-to-remote-work");
        assert_eq!(create_slug("  Rust: 10 Tips & Tricks!! "), "rust-10-tips-tricks");
    }

    #[test]
    fn test_non_ascii_collapses() {
        assert_eq!(create_slug("Café — über"), "caf-ber");
        assert_eq!(create_slug("???"), "");
    }

    #[test]
    fn test_truncates() {
        let slug = create_slug(&"ab ".repeat(80));
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }
}
