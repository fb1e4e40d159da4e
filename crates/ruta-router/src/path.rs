//! Path pattern matching.

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::segment::path_segments;

/// Arguments captured from placeholder and regex segments.
///
/// Keys keep the order of the segments that captured them. A key captured
/// twice keeps its first position and takes the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    args: Vec<(String, String)>,
}

impl PathArgs {
    /// Creates new empty path args.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an argument, overwriting any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.args.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.args.push((key, value)),
        }
    }

    /// Gets an argument value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parses an argument as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns the number of captured arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Returns an iterator over the arguments in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

/// How a pattern segment is interpreted when it is not literally equal to
/// the request segment.
#[derive(Debug, Clone)]
enum SegmentKind {
    /// Plain text.
    Literal,
    /// `{name}`.
    Placeholder(String),
    /// `regex(key=PATTERN)`.
    Regex { key: String, regex: Regex },
    /// A placeholder or regex segment that can never capture.
    Malformed,
}

/// A single segment of a route pattern.
#[derive(Debug, Clone)]
pub struct PatternSegment {
    raw: String,
    kind: SegmentKind,
}

/// Outcome of matching one pattern segment against one request segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentMatch {
    /// The segments are textually equal.
    Literal,
    /// A placeholder or regex segment captured the request segment.
    Capture {
        /// Argument name.
        key: String,
        /// Captured request segment.
        value: String,
    },
    /// The segment does not match.
    Reject,
}

impl PatternSegment {
    /// Parses a single pattern segment.
    ///
    /// Regular expressions are compiled here, once, rather than per request.
    /// A regex that fails to compile makes the segment malformed.
    pub fn parse(segment: &str) -> Self {
        let kind = if let Some(inner) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            let key = inner.trim();
            if key.is_empty() {
                SegmentKind::Malformed
            } else {
                SegmentKind::Placeholder(key.to_string())
            }
        } else if let Some(inner) = segment
            .strip_prefix("regex(")
            .and_then(|s| s.strip_suffix(')'))
        {
            match inner.split_once('=') {
                Some((key, pattern)) if !key.is_empty() => match Regex::new(pattern) {
                    Ok(regex) => SegmentKind::Regex {
                        key: key.to_string(),
                        regex,
                    },
                    Err(_) => SegmentKind::Malformed,
                },
                _ => SegmentKind::Malformed,
            }
        } else {
            SegmentKind::Literal
        };

        Self {
            raw: segment.to_string(),
            kind,
        }
    }

    /// Returns the segment text as written in the pattern.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the segment can capture an argument.
    pub fn is_capturing(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::Placeholder(_) | SegmentKind::Regex { .. }
        )
    }

    /// Matches this segment against a request segment.
    ///
    /// Textual equality always wins, even for segments that look like a
    /// placeholder. Regex patterns are not anchored implicitly; a pattern
    /// that must cover the whole segment has to use `^` and `$` itself.
    pub fn matches(&self, actual: &str) -> SegmentMatch {
        if self.raw == actual {
            return SegmentMatch::Literal;
        }

        match &self.kind {
            SegmentKind::Placeholder(key) => SegmentMatch::Capture {
                key: key.clone(),
                value: actual.to_string(),
            },
            SegmentKind::Regex { key, regex } if regex.is_match(actual) => SegmentMatch::Capture {
                key: key.clone(),
                value: actual.to_string(),
            },
            _ => SegmentMatch::Reject,
        }
    }
}

/// Matches one pattern segment against one request segment.
///
/// Convenience over [`PatternSegment::parse`] followed by
/// [`PatternSegment::matches`].
pub fn match_segment(defined: &str, actual: &str) -> SegmentMatch {
    PatternSegment::parse(defined).matches(actual)
}

/// Result of matching a route pattern against a request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    /// Whether the pattern matched.
    pub matched: bool,
    /// Captured arguments; always empty when `matched` is false.
    pub args: PathArgs,
}

impl RouteMatch {
    fn rejected() -> Self {
        Self::default()
    }
}

/// A parsed route pattern.
///
/// Pattern syntax, per segment:
/// - `users` - literal, must equal the request segment
/// - `{id}` - placeholder, captures the request segment as `id`
/// - `regex(id=^[0-9]+$)` - captures as `id` if the regex matches
#[derive(Debug, Clone)]
pub struct RoutePattern {
    /// The original pattern string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<PatternSegment>,
}

impl RoutePattern {
    /// Parses a path pattern string without validating it.
    ///
    /// # Example
    ///
    /// ```
    /// use ruta_router::{path_segments, RoutePattern};
    ///
    /// let pattern = RoutePattern::new("/posts/{id}/comments/regex(cid=^[0-9]+$)");
    /// let m = pattern.match_segments(&path_segments("/posts/abc/comments/7"));
    /// assert!(m.matched);
    /// assert_eq!(m.args.get("id"), Some("abc"));
    /// assert_eq!(m.args.get("cid"), Some("7"));
    /// ```
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            segments: path_segments(pattern)
                .iter()
                .map(|s| PatternSegment::parse(s))
                .collect(),
        }
    }

    /// Parses a pattern registered for a route.
    ///
    /// The pattern is trimmed and must be non-empty and start with `/`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(RouterError::InvalidPattern(
                "path pattern can not be empty".to_string(),
            ));
        }
        if !trimmed.starts_with('/') {
            return Err(RouterError::InvalidPattern(format!(
                "path pattern should start with a slash (/): {trimmed}"
            )));
        }
        Ok(Self::new(trimmed))
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Matches this pattern against the segments of a request path.
    ///
    /// A pattern without any capture must have exactly as many segments as
    /// the request path. Once a segment has captured, extra trailing request
    /// segments are accepted and left unmatched.
    pub fn match_segments<S: AsRef<str>>(&self, actual: &[S]) -> RouteMatch {
        if self.segments.is_empty() || actual.is_empty() {
            return RouteMatch::rejected();
        }

        let mut args = PathArgs::new();
        let mut captured = false;

        for (i, defined) in self.segments.iter().enumerate() {
            let Some(segment) = actual.get(i) else {
                return RouteMatch::rejected();
            };
            match defined.matches(segment.as_ref()) {
                SegmentMatch::Literal => {}
                SegmentMatch::Capture { key, value } => {
                    args.insert(key, value);
                    captured = true;
                }
                SegmentMatch::Reject => return RouteMatch::rejected(),
            }
        }

        if !captured && self.segments.len() < actual.len() {
            return RouteMatch::rejected();
        }

        RouteMatch {
            matched: true,
            args,
        }
    }

    /// Matches this pattern against a raw request path.
    pub fn match_path(&self, path: &str) -> RouteMatch {
        self.match_segments(&path_segments(path))
    }
}

/// Matches a pattern string against the segments of a request path.
pub fn match_path<S: AsRef<str>>(pattern: &str, actual: &[S]) -> RouteMatch {
    RoutePattern::new(pattern).match_segments(actual)
}
