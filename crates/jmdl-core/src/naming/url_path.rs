//! Filename and suffix extraction from image URLs.

/// Extracts the last path segment from a URL.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Splits a filename into base name and suffix (suffix keeps its leading dot).
///
/// `"00001.webp"` → `("00001", ".webp")`, `"README"` → `("README", "")`.
pub fn split_suffix(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(0) | None => (filename, ""),
        Some(pos) => filename.split_at(pos),
    }
}

/// Suffix of a URL or local path, with leading dot; empty when there is none.
///
/// Query strings and fragments are ignored for URLs.
pub fn suffix_of(url_or_path: &str) -> String {
    let name = match filename_from_url_path(url_or_path) {
        Some(name) => name,
        None => url_or_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    split_suffix(&name).1.to_string()
}

/// True if `url_or_suffix` literally ends in `.gif` (case-sensitive, query included).
pub fn is_gif(url_or_suffix: &str) -> bool {
    url_or_suffix.ends_with(".gif")
}

/// True if the two locations carry different suffixes (case-insensitive).
pub fn suffix_not_equal(a: &str, b: &str) -> bool {
    !suffix_of(a).eq_ignore_ascii_case(&suffix_of(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment_of_image_url() {
        assert_eq!(
            filename_from_url_path("https://cdn.example.com/media/photos/123/00001.webp").as_deref(),
            Some("00001.webp")
        );
        assert_eq!(filename_from_url_path("https://cdn.example.com/"), None);
        assert_eq!(filename_from_url_path("not a url"), None);
    }

    #[test]
    fn query_is_ignored() {
        assert_eq!(
            filename_from_url_path("https://cdn.example.com/a/00002.gif?v=1").as_deref(),
            Some("00002.gif")
        );
        assert_eq!(suffix_of("https://cdn.example.com/a/00002.gif?v=1"), ".gif");
    }

    #[test]
    fn gif_check_is_literal() {
        assert!(is_gif("https://cdn.example.com/a/00002.gif"));
        assert!(is_gif(".gif"));
        assert!(!is_gif("https://cdn.example.com/a/00002.gif?v=1"));
        assert!(!is_gif("https://cdn.example.com/a/00002.GIF"));
        assert!(!is_gif(".GIF"));
    }

    #[test]
    fn split_suffix_variants() {
        assert_eq!(split_suffix("00001.webp"), ("00001", ".webp"));
        assert_eq!(split_suffix("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_suffix("README"), ("README", ""));
        assert_eq!(split_suffix(".hidden"), (".hidden", ""));
    }

    #[test]
    fn suffix_of_local_paths() {
        assert_eq!(suffix_of("/tmp/out/00001.png"), ".png");
        assert_eq!(suffix_of("C:\\out\\00001.JPG"), ".JPG");
        assert_eq!(suffix_of("/tmp/out/noext"), "");
    }

    #[test]
    fn suffix_comparison_is_case_insensitive() {
        assert!(!suffix_not_equal("https://x.example/a/1.webp", "/tmp/1.WEBP"));
        assert!(suffix_not_equal("https://x.example/a/1.webp", "/tmp/1.png"));
    }
}
