//! Per-request dispatch state.

use std::collections::HashMap;

use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::segment::path_segments;

/// Protocol assumed when the server does not report one.
pub const DEFAULT_PROTO: &str = "HTTP/1.1";

/// Everything the router knows about the request being dispatched.
///
/// Built once per request and only read afterwards. Matching uses the
/// precomputed path segments; handlers get a fresh [`crate::Request`] built
/// from this state on every invocation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    uri: String,
    method: String,
    path: Vec<String>,
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
    content_type: String,
    proto: String,
    body: Vec<u8>,
}

impl RequestContext {
    /// Creates the context for an incoming request.
    ///
    /// The URI is percent-decoded (`+` becomes a space) before it is split
    /// into segments, and the method is trimmed. Fails with
    /// [`RouterError::Configuration`] if either is empty.
    pub fn new(
        raw_uri: &str,
        raw_method: &str,
        query: HashMap<String, String>,
    ) -> Result<Self> {
        let uri = url_decode(raw_uri);
        let method = raw_method.trim();
        if uri.is_empty() {
            return Err(RouterError::Configuration(
                "HTTP request uri is not provided".to_string(),
            ));
        }
        if method.is_empty() {
            return Err(RouterError::Configuration(
                "HTTP request method is not provided".to_string(),
            ));
        }

        Ok(Self {
            path: path_segments(&uri),
            uri,
            method: method.to_string(),
            query,
            headers: HashMap::new(),
            content_type: String::new(),
            proto: DEFAULT_PROTO.to_string(),
            body: Vec::new(),
        })
    }

    /// Sets the request headers. Keys are lowercased.
    #[must_use]
    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
            .collect();
        self
    }

    /// Sets the request content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.content_type = content_type.as_ref().trim().to_string();
        self
    }

    /// Sets the protocol, e.g. `HTTP/2.0`. Empty values keep the default.
    #[must_use]
    pub fn with_proto(mut self, proto: impl AsRef<str>) -> Self {
        let proto = proto.as_ref().trim();
        if !proto.is_empty() {
            self.proto = proto.to_string();
        }
        self
    }

    /// Sets the raw request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the decoded request URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the request method as received.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request method if it is a known one.
    pub fn known_method(&self) -> Option<Method> {
        self.method.parse().ok()
    }

    /// Returns the request path segments.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the query parameters.
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the protocol.
    pub fn proto(&self) -> &str {
        &self.proto
    }

    /// Returns the raw request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Decodes a percent-encoded string, treating `+` as a space.
///
/// Invalid escapes are kept as-is and invalid UTF-8 is replaced.
pub fn url_decode(s: &str) -> String {
    let plus_as_space = s.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(plus_as_space.as_bytes())).into_owned()
}

/// Parses query parameters from a query string.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (url_decode(key), url_decode(value))
        })
        .collect()
}

/// Extracts request headers from CGI meta-variables.
///
/// `HTTP_X_FORWARDED_FOR` becomes `x-forwarded-for`; variables without the
/// `HTTP_` prefix are ignored.
pub fn headers_from_cgi<I, K, V>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    vars.into_iter()
        .filter_map(|(name, value)| {
            let header = name.as_ref().strip_prefix("HTTP_")?;
            Some((header.to_lowercase().replace('_', "-"), value.into()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_uri_and_method() {
        assert!(matches!(
            RequestContext::new("", "GET", HashMap::new()),
            Err(RouterError::Configuration(_))
        ));
        assert!(matches!(
            RequestContext::new("/", "  ", HashMap::new()),
            Err(RouterError::Configuration(_))
        ));
    }

    #[test]
    fn test_uri_is_decoded_before_segmenting() {
        let ctx = RequestContext::new("/files/my%20doc/caf%C3%A9?x=1", " GET ", HashMap::new())
            .unwrap();
        assert_eq!(ctx.uri(), "/files/my doc/café?x=1");
        assert_eq!(ctx.method(), "GET");
        assert_eq!(ctx.path(), ["files", "my doc", "café"]);
        assert_eq!(ctx.known_method(), Some(Method::Get));
    }

    #[test]
    fn test_unknown_method_is_kept() {
        let ctx = RequestContext::new("/", "PROPFIND", HashMap::new()).unwrap();
        assert_eq!(ctx.method(), "PROPFIND");
        assert_eq!(ctx.known_method(), None);
    }

    #[test]
    fn test_builder() {
        let ctx = RequestContext::new("/", "POST", HashMap::new())
            .unwrap()
            .with_headers([("Content-Type", "application/json")])
            .with_content_type(" application/json ")
            .with_proto("")
            .with_body("{}");
        assert_eq!(
            ctx.headers().get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(ctx.content_type(), "application/json");
        assert_eq!(ctx.proto(), DEFAULT_PROTO);
        assert_eq!(ctx.body(), b"{}");
    }

    #[test]
    fn test_query_string_parsing() {
        let query = parse_query_string("name=John+Doe&age=30&city=New%20York&flag");
        assert_eq!(query.get("name"), Some(&"John Doe".to_string()));
        assert_eq!(query.get("age"), Some(&"30".to_string()));
        assert_eq!(query.get("city"), Some(&"New York".to_string()));
        assert_eq!(query.get("flag"), Some(&String::new()));
        assert!(parse_query_string("").is_empty());
    }

    #[test]
    fn test_url_decode_keeps_encoded_plus() {
        assert_eq!(url_decode("a%2Bb+c"), "a+b c");
        assert_eq!(url_decode("100%"), "100%");
    }

    #[test]
    fn test_headers_from_cgi() {
        let headers = headers_from_cgi([
            ("HTTP_X_FORWARDED_FOR", "10.0.0.1"),
            ("HTTP_ACCEPT", "*/*"),
            ("REQUEST_URI", "/"),
        ]);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("x-forwarded-for"), Some(&"10.0.0.1".to_string()));
        assert_eq!(headers.get("accept"), Some(&"*/*".to_string()));
    }
}
