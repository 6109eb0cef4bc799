//! Directory-name sanitization that stays valid on both Linux and Windows.

/// Placeholder for values that sanitize down to nothing.
const EMPTY_NAME: &str = "_";

/// Sanitizes an entity field value for use as a single path component.
///
/// - Replaces NUL, control characters, and `/ \ : * ? " < > |` with `_`
/// - Collapses runs of replaced characters into one `_`
/// - Trims surrounding whitespace and trailing dots (Windows drops them)
/// - Limits length to 255 bytes (NAME_MAX)
pub fn sanitize_dir_name(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        let illegal = c.is_control()
            || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');

        if illegal {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim().trim_end_matches(['.', ' ']);

    let limited = if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        &trimmed[..take]
    } else {
        trimmed
    };

    if limited.is_empty() || limited == ".." {
        EMPTY_NAME.to_string()
    } else {
        limited.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_windows_reserved_characters() {
        assert_eq!(sanitize_dir_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_dir_name("what?<yes>|no*"), "what_yes_no_");
        assert_eq!(sanitize_dir_name("say \"hi\""), "say _hi_");
    }

    #[test]
    fn collapses_adjacent_replacements_only() {
        assert_eq!(sanitize_dir_name("a//b"), "a_b");
        assert_eq!(sanitize_dir_name("keep__this"), "keep__this");
    }

    #[test]
    fn trims_whitespace_and_trailing_dots() {
        assert_eq!(sanitize_dir_name("  title...  "), "title");
        assert_eq!(sanitize_dir_name(".hidden"), ".hidden");
    }

    #[test]
    fn empty_and_parent_become_placeholder() {
        assert_eq!(sanitize_dir_name(""), "_");
        assert_eq!(sanitize_dir_name("   "), "_");
        assert_eq!(sanitize_dir_name("..."), "_");
    }

    #[test]
    fn numbers_and_unicode_pass_through() {
        assert_eq!(sanitize_dir_name("350234"), "350234");
        assert_eq!(sanitize_dir_name("漫画 第1話"), "漫画 第1話");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let out = sanitize_dir_name(&long);
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
