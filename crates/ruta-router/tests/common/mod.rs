#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ruta_router::{
    path_segments, Dispatch, HandlerArgs, Request, RequestContext, Response, RouteMatch,
    RoutePattern,
};

/// Shared record of handler invocations.
pub type Calls = Rc<RefCell<Vec<String>>>;

pub fn calls() -> Calls {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn ctx(method: &str, uri: &str) -> RequestContext {
    RequestContext::new(uri, method, HashMap::new())
        .unwrap_or_else(|e| panic!("Failed to build context for {method} {uri}: {e}"))
}

pub fn match_route(pattern: &str, path: &str) -> RouteMatch {
    RoutePattern::new(pattern).match_segments(&path_segments(path))
}

pub fn args_of(m: &RouteMatch) -> Vec<(&str, &str)> {
    m.args.iter().collect()
}

/// A handler that records `label` and sends it as the response body.
pub fn responder(
    calls: &Calls,
    label: &'static str,
) -> impl Fn(&Request, &mut Response, &HandlerArgs) + 'static {
    let calls = Rc::clone(calls);
    move |_req: &Request, res: &mut Response, _args: &HandlerArgs| {
        calls.borrow_mut().push(label.to_string());
        res.text(label);
    }
}

/// A handler that only records `label`.
pub fn recorder(
    calls: &Calls,
    label: &'static str,
) -> impl Fn(&Request, &mut Response, &HandlerArgs) + 'static {
    let calls = Rc::clone(calls);
    move |_req: &Request, _res: &mut Response, _args: &HandlerArgs| {
        calls.borrow_mut().push(label.to_string());
    }
}

pub fn recorded(calls: &Calls) -> Vec<String> {
    calls.borrow().clone()
}

pub fn last_body(dispatch: &Dispatch) -> Option<String> {
    dispatch.response().and_then(Response::body_string)
}
