//! # ruta-router
//!
//! A lightweight, segment-based HTTP routing library.
//!
//! This crate provides:
//! - Path segmentation that collapses repeated slashes and ignores the query
//! - Route patterns with literal, `{placeholder}` and `regex(key=PATTERN)`
//!   segments
//! - Method-based dispatch with first-match-wins semantics
//! - Middleware that runs without ending the dispatch
//! - A not-found fallback, either a custom handler or a default 404
//! - Function handlers and controller actions behind one [`Handler`] trait
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use ruta_router::{HandlerArgs, Request, RequestContext, Response, Router};
//!
//! fn hello(_req: &Request, res: &mut Response, _args: &HandlerArgs) {
//!     res.text("Hello, World!");
//! }
//!
//! fn user(_req: &Request, res: &mut Response, args: &HandlerArgs) {
//!     res.json(&serde_json::json!({ "id": args.get("id") }));
//! }
//!
//! let router = Router::new()
//!     .get("/hello", hello)?
//!     .get("/users/{id}", user)?;
//!
//! // Handle a request
//! let ctx = RequestContext::new("/users/123", "GET", HashMap::new())?;
//! let dispatch = router.dispatch(&ctx)?;
//! assert!(dispatch.is_dispatched());
//! # Ok::<(), ruta_router::RouterError>(())
//! ```
//!
//! ## Route Patterns
//!
//! Each pattern segment is matched against the request segment at the same
//! position:
//!
//! ```ignore
//! router.get("/posts/{post_id}/comments/regex(comment_id=^[0-9]+$)", handler)
//! ```
//!
//! A pattern made only of literal segments matches paths of exactly its
//! length. A pattern with at least one capturing segment also matches longer
//! paths; the extra trailing segments are ignored.
//!
//! ## Middleware and Not Found
//!
//! ```ignore
//! use ruta_router::{MethodSet, Router};
//!
//! let router = Router::new()
//!     .middleware(MethodSet::any(), log_request)
//!     .get("/", handler)?
//!     .not_found(custom_404);
//! ```
//!
//! ## Controllers
//!
//! ```ignore
//! use ruta_router::{MethodHandler, Router};
//!
//! let router = Router::new()
//!     .get("/home/{path}/some", MethodHandler::<HomeCtrl>::new("index")?)?;
//! ```

mod context;
mod error;
mod handler;
mod method;
mod path;
mod request;
mod response;
mod router;
mod segment;
pub mod status;

pub use context::{headers_from_cgi, parse_query_string, url_decode, RequestContext};
pub use error::{Result, RouterError};
pub use handler::{Controller, Handler, HandlerArgs, MethodHandler, RouteData};
pub use method::{Method, MethodSet, UnknownMethod};
pub use path::{
    match_path, match_segment, PathArgs, PatternSegment, RouteMatch, RoutePattern, SegmentMatch,
};
pub use request::Request;
pub use response::Response;
pub use router::{Dispatch, Outcome, Router};
pub use segment::path_segments;
