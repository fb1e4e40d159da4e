//! HTTP request methods.

use std::fmt;
use std::str::FromStr;

/// HTTP request methods (RFC 7231 section 4 and RFC 5789).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// GET method
    Get,
    /// HEAD method
    Head,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// DELETE method
    Delete,
    /// CONNECT method
    Connect,
    /// OPTIONS method
    Options,
    /// TRACE method
    Trace,
    /// PATCH method
    Patch,
}

impl Method {
    /// Every supported method, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Connect,
        Self::Options,
        Self::Trace,
        Self::Patch,
    ];

    /// Returns the method as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }
}

/// Error returned when a string is not a known HTTP method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Parses a method name. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of methods a registration answers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodSet {
    bits: u16,
}

impl MethodSet {
    /// An empty set; a registration with it never runs.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every method (`ANY`).
    pub fn any() -> Self {
        Self::some(Method::ALL)
    }

    /// An explicit subset of methods (`SOME`).
    pub fn some(methods: impl IntoIterator<Item = Method>) -> Self {
        methods.into_iter().fold(Self::empty(), Self::with)
    }

    /// Returns this set with `method` added.
    #[must_use]
    pub fn with(self, method: Method) -> Self {
        Self {
            bits: self.bits | Self::bit(method),
        }
    }

    /// Returns `true` if `method` is in the set.
    pub fn contains(&self, method: Method) -> bool {
        self.bits & Self::bit(method) != 0
    }

    /// Returns `true` if the set holds no method.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the methods in the set.
    pub fn iter(&self) -> impl Iterator<Item = Method> {
        let set = *self;
        Method::ALL.into_iter().filter(move |m| set.contains(*m))
    }

    fn bit(method: Method) -> u16 {
        1 << (method as u16)
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        Self::empty().with(method)
    }
}

impl<const N: usize> From<[Method; N]> for MethodSet {
    fn from(methods: [Method; N]) -> Self {
        Self::some(methods)
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|m| m.as_str()).collect();
        f.write_str(&names.join("|"))
    }
}
