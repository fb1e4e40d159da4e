//! Main router implementation.

use std::io::{self, Write};

use tracing::{debug, info};

use crate::context::RequestContext;
use crate::error::Result;
use crate::handler::{Handler, HandlerArgs, RouteData};
use crate::method::{Method, MethodSet};
use crate::path::{PathArgs, RoutePattern};
use crate::request::Request;
use crate::response::Response;
use crate::status::{self, status_text};

/// What a registration matches on.
enum Target {
    /// A route pattern. A match ends the dispatch.
    Route(RoutePattern),
    /// Runs for every request with an allowed method, then dispatch goes on.
    Middleware,
}

/// A single entry of the dispatch table.
struct Registration {
    target: Target,
    methods: MethodSet,
    handler: Box<dyn Handler>,
    data: RouteData,
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A route handler ran.
    Dispatched,
    /// No route matched; the not-found fallback ran.
    NotFound,
}

/// The result of dispatching one request.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// How the dispatch ended.
    pub outcome: Outcome,
    /// Responses sent by handlers, in invocation order.
    pub responses: Vec<Response>,
}

impl Dispatch {
    /// Returns `true` if a route handler ran.
    pub fn is_dispatched(&self) -> bool {
        self.outcome == Outcome::Dispatched
    }

    /// Returns the last response sent, if any.
    pub fn response(&self) -> Option<&Response> {
        self.responses.last()
    }

    /// Writes the dispatch as a single CGI reply.
    ///
    /// Status and headers come from the last response sent, which is the
    /// route's or the not-found one whenever they sent anything. The bodies
    /// of all sent responses follow in invocation order and `content-length`
    /// covers them together. An empty `200 OK` is written if nothing was
    /// sent.
    pub fn write_cgi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(head) = self.response() else {
            return Response::new().write_cgi(out);
        };
        let length = self.responses.iter().map(Response::content_length).sum();
        head.write_head(out, Some(length))?;
        for res in &self.responses {
            out.write_all(res.body())?;
        }
        out.flush()
    }
}

/// The request dispatcher.
///
/// Registrations are evaluated in the order they were added. Middleware runs
/// whenever its method set allows the request method. The first route whose
/// methods and pattern both match is invoked and ends the dispatch; if none
/// does, the not-found handler runs, or a default `404 Not Found` is sent.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use ruta_router::{HandlerArgs, Request, RequestContext, Response, Router};
///
/// fn user(_req: &Request, res: &mut Response, args: &HandlerArgs) {
///     res.text(format!("User: {}", args.get("id").unwrap_or("?")));
/// }
///
/// let router = Router::new().get("/users/{id}", user)?;
/// let ctx = RequestContext::new("/users/123", "GET", HashMap::new())?;
/// let dispatch = router.dispatch(&ctx)?;
/// assert!(dispatch.is_dispatched());
/// assert_eq!(dispatch.response().and_then(|r| r.body_string()), Some("User: 123".into()));
/// # Ok::<(), ruta_router::RouterError>(())
/// ```
#[derive(Default)]
pub struct Router {
    registrations: Vec<Registration>,
    not_found: Option<(Box<dyn Handler>, RouteData)>,
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a GET route.
    pub fn get(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Get, path, handler)
    }

    /// Adds a HEAD route.
    pub fn head(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Head, path, handler)
    }

    /// Adds a POST route.
    pub fn post(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Post, path, handler)
    }

    /// Adds a PUT route.
    pub fn put(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Put, path, handler)
    }

    /// Adds a DELETE route.
    pub fn delete(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Delete, path, handler)
    }

    /// Adds a CONNECT route.
    pub fn connect(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Connect, path, handler)
    }

    /// Adds an OPTIONS route.
    pub fn options(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Options, path, handler)
    }

    /// Adds a TRACE route.
    pub fn trace(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Trace, path, handler)
    }

    /// Adds a PATCH route.
    pub fn patch(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(Method::Patch, path, handler)
    }

    /// Adds a route answering to every method.
    pub fn any(self, path: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.route(MethodSet::any(), path, handler)
    }

    /// Adds a route answering to the given methods.
    pub fn some(
        self,
        methods: impl IntoIterator<Item = Method>,
        path: &str,
        handler: impl Handler + 'static,
    ) -> Result<Self> {
        self.route(MethodSet::some(methods), path, handler)
    }

    /// Adds a route with any method set.
    pub fn route(
        self,
        methods: impl Into<MethodSet>,
        path: &str,
        handler: impl Handler + 'static,
    ) -> Result<Self> {
        self.route_with_data(methods, path, handler, RouteData::new())
    }

    /// Adds a route whose handler also receives `data`.
    ///
    /// Fails with [`crate::RouterError::InvalidPattern`] if `path` is empty
    /// or does not start with `/`.
    pub fn route_with_data(
        mut self,
        methods: impl Into<MethodSet>,
        path: &str,
        handler: impl Handler + 'static,
        data: RouteData,
    ) -> Result<Self> {
        let pattern = RoutePattern::parse(path)?;
        let methods = methods.into();
        debug!(
            methods = %methods,
            pattern = %pattern.pattern(),
            handler = %handler.name(),
            "Registering route"
        );
        self.registrations.push(Registration {
            target: Target::Route(pattern),
            methods,
            handler: Box::new(handler),
            data,
        });
        Ok(self)
    }

    /// Adds middleware for the given methods.
    #[must_use]
    pub fn middleware(
        self,
        methods: impl Into<MethodSet>,
        handler: impl Handler + 'static,
    ) -> Self {
        self.middleware_with_data(methods, handler, RouteData::new())
    }

    /// Adds middleware whose handler also receives `data`.
    #[must_use]
    pub fn middleware_with_data(
        mut self,
        methods: impl Into<MethodSet>,
        handler: impl Handler + 'static,
        data: RouteData,
    ) -> Self {
        let methods = methods.into();
        debug!(methods = %methods, handler = %handler.name(), "Registering middleware");
        self.registrations.push(Registration {
            target: Target::Middleware,
            methods,
            handler: Box::new(handler),
            data,
        });
        self
    }

    /// Sets the handler invoked when no route matches.
    #[must_use]
    pub fn not_found(self, handler: impl Handler + 'static) -> Self {
        self.not_found_with_data(handler, RouteData::new())
    }

    /// Sets the not-found handler together with its data.
    #[must_use]
    pub fn not_found_with_data(mut self, handler: impl Handler + 'static, data: RouteData) -> Self {
        debug!(handler = %handler.name(), "Registering not-found handler");
        self.not_found = Some((Box::new(handler), data));
        self
    }

    /// Returns the number of registrations, middleware included.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Dispatches a request.
    ///
    /// A method or pattern mismatch is not an error: it only moves on to the
    /// next registration, and eventually to the not-found fallback. Errors
    /// come from handlers that can not be resolved.
    pub fn dispatch(&self, ctx: &RequestContext) -> Result<Dispatch> {
        let method = ctx.known_method();
        let mut responses = Vec::new();

        for reg in &self.registrations {
            if !method.is_some_and(|m| reg.methods.contains(m)) {
                debug!(
                    method = %ctx.method(),
                    allowed = %reg.methods,
                    "Method not allowed, skipping registration"
                );
                continue;
            }

            match &reg.target {
                Target::Middleware => {
                    debug!(handler = %reg.handler.name(), "Running middleware");
                    invoke(&*reg.handler, ctx, PathArgs::new(), &reg.data, &mut responses)?;
                }
                Target::Route(pattern) => {
                    let found = pattern.match_segments(ctx.path());
                    if !found.matched {
                        debug!(
                            pattern = %pattern.pattern(),
                            uri = %ctx.uri(),
                            "Route did not match"
                        );
                        continue;
                    }

                    info!(
                        method = %ctx.method(),
                        uri = %ctx.uri(),
                        pattern = %pattern.pattern(),
                        handler = %reg.handler.name(),
                        "Dispatching route"
                    );
                    invoke(&*reg.handler, ctx, found.args, &reg.data, &mut responses)?;

                    return Ok(Dispatch {
                        outcome: Outcome::Dispatched,
                        responses,
                    });
                }
            }
        }

        match &self.not_found {
            Some((handler, data)) => {
                debug!(
                    method = %ctx.method(),
                    uri = %ctx.uri(),
                    handler = %handler.name(),
                    "No route matched, running not-found handler"
                );
                invoke(&**handler, ctx, PathArgs::new(), data, &mut responses)?;
            }
            None => {
                debug!(method = %ctx.method(), uri = %ctx.uri(), "No route matched, sending 404");
                let mut res = Response::for_method(ctx.method());
                res.status(status::NOT_FOUND)
                    .text(status_text(status::NOT_FOUND));
                responses.push(res);
            }
        }

        Ok(Dispatch {
            outcome: Outcome::NotFound,
            responses,
        })
    }
}

/// Invokes a handler with a fresh request and response, keeping the
/// response if the handler sent it.
fn invoke(
    handler: &dyn Handler,
    ctx: &RequestContext,
    args: PathArgs,
    data: &RouteData,
    responses: &mut Vec<Response>,
) -> Result<()> {
    let req = Request::from_context(ctx);
    let mut res = Response::for_method(ctx.method());
    handler.invoke(&req, &mut res, &HandlerArgs::new(args, data.clone()))?;
    if res.is_sent() {
        responses.push(res);
    }
    Ok(())
}
