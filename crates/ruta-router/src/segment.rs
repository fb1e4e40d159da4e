//! Path segmentation.

/// Splits a path into its non-empty segments.
///
/// Only the path component is considered: anything from the first `?` or
/// `#` onwards is dropped and surrounding whitespace is trimmed. Runs of
/// slashes act as a single separator, so leading, trailing and repeated
/// slashes never produce empty segments. Segments are returned verbatim
/// (no percent-decoding, case preserved).
///
/// # Example
///
/// ```
/// use ruta_router::path_segments;
///
/// assert_eq!(path_segments("//reg/1234//exp/?page=2"), vec!["reg", "1234", "exp"]);
/// assert!(path_segments("/").is_empty());
/// ```
pub fn path_segments(path: &str) -> Vec<String> {
    let path = path_component(path).trim();

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in path.chars() {
        if c == '/' {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(c);
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Returns the path component of a request target.
fn path_component(target: &str) -> &str {
    target
        .find(|c| c == '?' || c == '#')
        .map_or(target, |end| &target[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_paths() {
        assert!(path_segments("").is_empty());
        assert!(path_segments("/").is_empty());
        assert!(path_segments("////").is_empty());
    }

    #[test]
    fn test_plain_segments() {
        assert_eq!(path_segments("/reg/1234/exp"), vec!["reg", "1234", "exp"]);
        assert_eq!(path_segments("reg/1234"), vec!["reg", "1234"]);
    }

    #[test]
    fn test_repeated_slashes_collapse() {
        assert_eq!(path_segments("//a///b/"), path_segments("/a/b"));
        assert_eq!(path_segments("//reg/1234//exp/"), vec!["reg", "1234", "exp"]);
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(path_segments("/abc/def ghi/"), vec!["abc", "def ghi"]);
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(
            path_segments("/ábc/dñefgh/12.html"),
            vec!["ábc", "dñefgh", "12.html"]
        );
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(path_segments("/users/42?tab=posts"), vec!["users", "42"]);
        assert_eq!(path_segments("/docs#intro"), vec!["docs"]);
        assert!(path_segments("/?q=1").is_empty());
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(path_segments("/Users/ABC"), vec!["Users", "ABC"]);
    }
}
