//! HTTP response type.

use std::io::{self, Write};

use crate::method::Method;
use crate::status::{self, status_text};

/// An HTTP response filled in by a handler.
///
/// The router hands every handler a fresh response. Nothing is emitted until
/// the handler sends it with [`Response::text`], [`Response::json`],
/// [`Response::xml`], [`Response::html`] or [`Response::redirect`].
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    skip_body: bool,
    sent: bool,
}

impl Response {
    /// Creates an empty `200 OK` response.
    pub fn new() -> Self {
        Self {
            status: status::OK,
            headers: Vec::new(),
            body: Vec::new(),
            skip_body: false,
            sent: false,
        }
    }

    /// Creates the response for a request method. HEAD responses never
    /// carry a body.
    pub fn for_method(method: &str) -> Self {
        let mut res = Self::new();
        if method.parse::<Method>() == Ok(Method::Head) {
            res.skip_body = true;
        }
        res
    }

    /// Sets the status code. Codes without a reason phrase are ignored.
    pub fn status(&mut self, code: u16) -> &mut Self {
        if !status_text(code).is_empty() {
            self.status = code;
        }
        self
    }

    /// Sets a header. The key is trimmed and lowercased; empty keys are
    /// ignored.
    pub fn header(&mut self, key: &str, value: impl AsRef<str>) -> &mut Self {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return self;
        }
        let value = value.as_ref().trim().to_string();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Prevents the body from being written.
    pub fn skip_body_sending(&mut self) -> &mut Self {
        self.skip_body = true;
        self
    }

    /// Sends a plain text response.
    pub fn text(&mut self, data: impl Into<String>) {
        self.header("content-type", "text/plain;charset=utf-8");
        self.send(data.into().into_bytes());
    }

    /// Sends a JSON response.
    ///
    /// Falls back to a `500 Internal Server Error` text response if `data`
    /// can not be serialized.
    pub fn json<T: serde::Serialize>(&mut self, data: &T) {
        match serde_json::to_vec(data) {
            Ok(body) => {
                self.header("content-type", "application/json;charset=utf-8");
                self.send(body);
            }
            Err(_) => {
                self.status(status::INTERNAL_SERVER_ERROR);
                self.text(status_text(status::INTERNAL_SERVER_ERROR));
            }
        }
    }

    /// Sends an XML response.
    pub fn xml(&mut self, data: impl Into<String>) {
        self.header("content-type", "application/xml;charset=utf-8");
        self.send(data.into().into_bytes());
    }

    /// Sends an HTML response.
    pub fn html(&mut self, data: impl Into<String>) {
        self.header("content-type", "text/html;charset=utf-8");
        self.send(data.into().into_bytes());
    }

    /// Sends a `308 Permanent Redirect` to `url`.
    pub fn redirect(&mut self, url: &str) {
        self.redirect_with(url, status::PERMANENT_REDIRECT);
    }

    /// Sends a redirect to `url` with the given status.
    pub fn redirect_with(&mut self, url: &str, status: u16) {
        self.status(status);
        self.header("location", url);
        self.send(Vec::new());
    }

    fn send(&mut self, body: Vec<u8>) {
        self.header("content-length", body.len().to_string());
        self.body = body;
        self.sent = true;
    }

    /// Returns the status code.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Returns the status line, e.g. `HTTP/1.1 404 Not Found`.
    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {} {}", self.status, status_text(self.status))
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the headers in the order they were first set.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the body that will be written, empty if it is skipped.
    pub fn body(&self) -> &[u8] {
        if self.skip_body {
            &[]
        } else {
            &self.body
        }
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body().to_vec()).ok()
    }

    /// Returns `true` once the handler has sent the response.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Writes the response as a CGI reply.
    pub fn write_cgi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_head(out, None)?;
        out.write_all(self.body())?;
        out.flush()
    }

    /// Writes the status and header block, replacing `content-length` with
    /// `length` when given.
    pub(crate) fn write_head<W: Write>(
        &self,
        out: &mut W,
        length: Option<usize>,
    ) -> io::Result<()> {
        write!(out, "Status: {} {}\r\n", self.status, status_text(self.status))?;
        for (key, value) in &self.headers {
            match length {
                Some(length) if key == "content-length" => write!(out, "{key}: {length}\r\n")?,
                _ => write!(out, "{key}: {value}\r\n")?,
            }
        }
        out.write_all(b"\r\n")
    }

    /// Length of the body as sent, including a skipped one.
    pub(crate) fn content_length(&self) -> usize {
        self.body.len()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let res = Response::new();
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.status_line(), "HTTP/1.1 200 OK");
        assert!(!res.is_sent());
    }

    #[test]
    fn test_unknown_status_is_ignored() {
        let mut res = Response::new();
        res.status(404).status(999);
        assert_eq!(res.status_code(), 404);
    }

    #[test]
    fn test_header_normalization() {
        let mut res = Response::new();
        res.header(" X-Custom ", " value ")
            .header("", "ignored")
            .header("x-custom", "other");
        assert_eq!(res.get_header("X-CUSTOM"), Some("other"));
        assert_eq!(res.headers().count(), 1);
    }

    #[test]
    fn test_text() {
        let mut res = Response::new();
        res.text("Hello");
        assert!(res.is_sent());
        assert_eq!(res.get_header("content-type"), Some("text/plain;charset=utf-8"));
        assert_eq!(res.get_header("content-length"), Some("5"));
        assert_eq!(res.body_string(), Some("Hello".to_string()));
    }

    #[test]
    fn test_json() {
        let mut res = Response::new();
        res.json(&serde_json::json!({"name": "test"}));
        assert_eq!(
            res.get_header("content-type"),
            Some("application/json;charset=utf-8")
        );
        assert_eq!(res.body_string(), Some(r#"{"name":"test"}"#.to_string()));
    }

    #[test]
    fn test_redirect() {
        let mut res = Response::new();
        res.redirect("/login");
        assert_eq!(res.status_code(), 308);
        assert_eq!(res.get_header("location"), Some("/login"));
        assert_eq!(res.get_header("content-length"), Some("0"));

        let mut res = Response::new();
        res.redirect_with("/home", 302);
        assert_eq!(res.status_code(), 302);
    }

    #[test]
    fn test_head_skips_body() {
        let mut res = Response::for_method("HEAD");
        res.html("<h1>Hi</h1>");
        assert_eq!(res.get_header("content-length"), Some("11"));
        assert!(res.body().is_empty());
    }

    #[test]
    fn test_skip_body_sending() {
        let mut res = Response::new();
        res.skip_body_sending().text("hidden");
        assert!(res.is_sent());
        assert_eq!(res.get_header("content-length"), Some("6"));
        assert!(res.body().is_empty());

        let mut out = Vec::new();
        res.write_cgi(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_xml() {
        let mut res = Response::new();
        res.xml("<ok/>");
        assert!(res.is_sent());
        assert_eq!(
            res.get_header("content-type"),
            Some("application/xml;charset=utf-8")
        );
        assert_eq!(res.get_header("content-length"), Some("5"));
        assert_eq!(res.body_string(), Some("<ok/>".to_string()));
    }

    #[test]
    fn test_write_cgi() {
        let mut res = Response::new();
        res.status(404).text("Not Found");
        let mut out = Vec::new();
        res.write_cgi(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Status: 404 Not Found\r\n\
             content-type: text/plain;charset=utf-8\r\n\
             content-length: 9\r\n\
             \r\n\
             Not Found"
        );
    }
}
