//! HTTP request type.

use std::collections::HashMap;
use std::convert::Infallible;

use futures::executor::block_on;
use futures::stream;
use tracing::debug;

use crate::context::{parse_query_string, RequestContext};
use crate::method::Method;

/// An HTTP request as seen by a handler.
///
/// A fresh value is built from the [`RequestContext`] for every handler
/// invocation, so a handler can never observe another handler's changes.
#[derive(Debug, Clone)]
pub struct Request {
    uri: String,
    method: String,
    path: Vec<String>,
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
    content_type: String,
    proto: String,
    body: Vec<u8>,
}

impl Request {
    /// Builds the request from the dispatch state.
    ///
    /// The body is only kept for POST, PUT and DELETE requests.
    pub fn from_context(ctx: &RequestContext) -> Self {
        let keeps_body = matches!(
            ctx.known_method(),
            Some(Method::Post | Method::Put | Method::Delete)
        );
        Self {
            uri: ctx.uri().to_string(),
            method: ctx.method().to_string(),
            path: ctx.path().to_vec(),
            query: ctx.query().clone(),
            headers: ctx.headers().clone(),
            content_type: ctx.content_type().to_string(),
            proto: ctx.proto().to_string(),
            body: if keeps_body {
                ctx.body().to_vec()
            } else {
                Vec::new()
            },
        }
    }

    /// Returns the decoded request URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request path split into segments.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the query parameters.
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Gets a query parameter.
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns the request headers, keyed by lowercase name.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Gets a header value. Lookup is case-insensitive.
    pub fn header(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        self.headers
            .get(&key.to_lowercase())
            .map(String::as_str)
    }

    /// Returns the protocol and version, e.g. `HTTP/1.1`.
    pub fn proto(&self) -> &str {
        &self.proto
    }

    /// Returns the body in its raw format.
    pub fn raw(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body of an `application/json` request.
    ///
    /// Returns `None` for other content types.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        if !self.content_type.starts_with("application/json") {
            return None;
        }
        Some(serde_json::from_slice(&self.body))
    }

    /// Parses the body of an `application/x-www-form-urlencoded` request.
    ///
    /// Returns an empty map for other content types.
    pub fn urlencoded(&self) -> HashMap<String, String> {
        if !self
            .content_type
            .starts_with("application/x-www-form-urlencoded")
        {
            return HashMap::new();
        }
        parse_query_string(&String::from_utf8_lossy(&self.body))
    }

    /// Parses the text fields of a `multipart/form-data` POST request.
    ///
    /// File parts are skipped. Returns an empty map for other methods and
    /// content types, and the fields read so far if the body is malformed.
    pub fn multipart(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        if self.method != Method::Post.as_str()
            || !self.content_type.starts_with("multipart/form-data")
        {
            return fields;
        }
        let boundary = match multer::parse_boundary(&self.content_type) {
            Ok(boundary) => boundary,
            Err(err) => {
                debug!(error = %err, "Multipart body without a boundary");
                return fields;
            }
        };

        let body = self.body.clone();
        let stream = stream::once(async move { Ok::<_, Infallible>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        block_on(async {
            loop {
                let field = match multipart.next_field().await {
                    Ok(Some(field)) => field,
                    Ok(None) => break,
                    Err(err) => {
                        debug!(error = %err, "Malformed multipart body");
                        break;
                    }
                };
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => {
                        fields.insert(name, value);
                    }
                    Err(err) => {
                        debug!(error = %err, field = %name, "Unreadable multipart field");
                        break;
                    }
                }
            }
        });
        fields
    }

    /// Parses the body of an `application/xml` request.
    ///
    /// Returns `None` for other content types and for bodies that are not
    /// well-formed XML.
    pub fn xml(&self) -> Option<roxmltree::Document<'_>> {
        if !self.content_type.starts_with("application/xml") {
            return None;
        }
        let text = std::str::from_utf8(&self.body).ok()?;
        roxmltree::Document::parse(text).ok()
    }
}
